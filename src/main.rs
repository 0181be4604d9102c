// src/main.rs

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    studenthub::cli::run().await
}
