fn main() -> anyhow::Result<()> {
    mopatch::cli::run_cli()
}
