use mealcart::Fixture;
use mealcart_shopping::SqliteStore;

pub async fn import(config: mealcart::Config, path: String) -> anyhow::Result<()> {
    let data = tokio::fs::read_to_string(&path).await?;
    let fixture = Fixture::from_json(&data)?;

    let pool = mealcart::create_pool(&config.database.url, 1).await?;
    fixture.apply(&SqliteStore(pool)).await?;

    tracing::info!("{path} imported");

    Ok(())
}
