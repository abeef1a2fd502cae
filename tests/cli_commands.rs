//! End-to-end: migrate, import a fixture, then read the grocery list

use mealcart::{Config, Fixture, config::DatabaseConfig};
use mealcart_shopping::{GroceryAggregator, GroceryBoard, Refresh};

const FIXTURE: &str = r#"{
  "ingredients": [
    { "id": "flour", "name": "Flour" },
    { "id": "milk", "name": "Milk" },
    { "id": "eggs", "name": "Eggs" }
  ],
  "recipes": [
    {
      "id": "pancakes",
      "ingredients": [
        { "ingredient_id": "flour", "quantity": 200, "unit": "g" },
        { "ingredient_id": "milk", "quantity": 300, "unit": "ml" },
        { "ingredient_id": "eggs", "quantity": 2, "unit": "piece" }
      ]
    },
    {
      "id": "bread",
      "ingredients": [{ "ingredient_id": "flour", "quantity": 300, "unit": "g" }]
    }
  ],
  "meal_plan": [
    { "day": "monday", "meal_slot": "breakfast", "recipe_id": "pancakes" },
    { "day": "thursday", "meal_slot": "dinner", "recipe_id": "bread" }
  ],
  "pantry": [
    { "ingredient_id": "flour", "quantity": 150, "unit": "g" },
    { "ingredient_id": "eggs", "quantity": 6 }
  ]
}"#;

fn config(dir: &temp_dir::TempDir) -> Config {
    Config {
        database: DatabaseConfig {
            url: format!("sqlite:{}", dir.child("mealcart.db").display()),
            max_connections: 1,
        },
        logging: Default::default(),
        grocery: Default::default(),
    }
}

#[tokio::test]
async fn test_migrate_import_and_list() -> anyhow::Result<()> {
    let dir = temp_dir::TempDir::new()?;
    let config = config(&dir);

    mealcart::migrate::migrate(&config).await?;
    // Applying twice is a no-op
    mealcart::migrate::migrate(&config).await?;

    let pool = mealcart::create_pool(&config.database.url, 1).await?;
    Fixture::from_json(FIXTURE)?
        .apply(&mealcart_shopping::SqliteStore(pool.clone()))
        .await?;

    let board = mealcart::open_board(pool, &config.grocery).await?;
    let Refresh::Published(list) = board.refresh().await? else {
        panic!("refresh must publish");
    };

    let lines: Vec<_> = list
        .to_buy
        .iter()
        .map(|l| (l.name.as_str(), l.formatted_quantity()))
        .collect();
    assert_eq!(
        lines,
        vec![("Flour", "350 g".to_string()), ("Milk", "300 ml".to_string())]
    );

    board.mark_bought(&"milk".into()).await?;
    let current = board.current().await.expect("published list");
    assert_eq!(current.bought[0].name, "Milk");

    let json = serde_json::to_value(current.as_ref())?;
    assert_eq!(json["bought"][0]["ingredient_id"], "milk");
    assert_eq!(json["to_buy"][0]["unit"], "g");
    assert!(json["last_updated"].is_string());

    Ok(())
}

#[tokio::test]
async fn test_reset_drops_previous_data() -> anyhow::Result<()> {
    let dir = temp_dir::TempDir::new()?;
    let config = config(&dir);

    mealcart::migrate::migrate(&config).await?;
    let pool = mealcart::create_pool(&config.database.url, 1).await?;
    Fixture::from_json(FIXTURE)?
        .apply(&mealcart_shopping::SqliteStore(pool.clone()))
        .await?;
    pool.close().await;

    mealcart::migrate::reset(&config).await?;

    let pool = mealcart::create_pool(&config.database.url, 1).await?;
    let board = mealcart::open_board(pool, &config.grocery).await?;
    let Refresh::Published(list) = board.refresh().await? else {
        panic!("refresh must publish");
    };
    assert!(list.is_empty());

    Ok(())
}

#[tokio::test]
async fn test_importing_twice_does_not_double_recipes() -> anyhow::Result<()> {
    let dir = temp_dir::TempDir::new()?;
    let config = config(&dir);
    mealcart::migrate::migrate(&config).await?;

    let pool = mealcart::create_pool(&config.database.url, 1).await?;
    let store = mealcart_shopping::SqliteStore(pool.clone());
    let fixture = Fixture::from_json(FIXTURE)?;
    fixture.apply(&store).await?;
    fixture.apply(&store).await?;

    let board = mealcart::open_board(pool, &config.grocery).await?;
    let Refresh::Published(list) = board.refresh().await? else {
        panic!("refresh must publish");
    };

    assert_eq!(list.to_buy[0].name, "Flour");
    assert_eq!(list.to_buy[0].quantity_to_buy, 350.0);
    assert_eq!(list.to_buy[1].quantity_to_buy, 300.0);

    Ok(())
}

#[tokio::test]
async fn test_failed_import_writes_nothing() -> anyhow::Result<()> {
    let dir = temp_dir::TempDir::new()?;
    let config = config(&dir);
    mealcart::migrate::migrate(&config).await?;

    let fixture = r#"{
      "ingredients": [{ "id": "flour", "name": "Flour" }],
      "recipes": [{
        "id": "bread",
        "ingredients": [{ "ingredient_id": "flour", "quantity": 300, "unit": "g" }]
      }],
      "meal_plan": [{ "day": "monday", "meal_slot": "dinner", "recipe_id": "bread" }],
      "pantry": [{ "ingredient_id": "flour", "quantity": -1 }]
    }"#;

    let pool = mealcart::create_pool(&config.database.url, 1).await?;
    let store = mealcart_shopping::SqliteStore(pool);
    assert!(Fixture::from_json(fixture)?.apply(&store).await.is_err());

    assert!(store.catalog_snapshot().await?.is_empty());
    let board = GroceryBoard::new(GroceryAggregator::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
    ));
    let Refresh::Published(list) = board.refresh().await? else {
        panic!("refresh must publish");
    };
    assert!(list.is_empty());

    Ok(())
}

#[test]
fn test_fixture_rejects_unknown_units() {
    let fixture = r#"{
      "recipes": [{
        "id": "soup",
        "ingredients": [{ "ingredient_id": "salt", "quantity": 1, "unit": "pinch" }]
      }]
    }"#;

    assert!(Fixture::from_json(fixture).is_err());
}
