fn main() -> anyhow::Result<()> {
    implementors_app::run()
}
