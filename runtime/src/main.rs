//! `vahti` - run the alarm pipeline with the built-in feeds

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    vahti_runtime::run().await?;
    Ok(())
}
