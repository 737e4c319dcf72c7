#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bloglist::start_server().await
}
