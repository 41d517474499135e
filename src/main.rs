#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aula_rust::run().await
}
