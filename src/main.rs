use errorstream_reporter::app;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::main().await
}
