#[tokio::main]
async fn main() -> anyhow::Result<()> {
    aula_rust::run_seed().await
}
