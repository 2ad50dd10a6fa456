fn main() -> anyhow::Result<()> {
    icswap_lib::run()
}
