#[tokio::main]
async fn main() -> anyhow::Result<()> {
    letsy_partner_api::app::run().await
}
