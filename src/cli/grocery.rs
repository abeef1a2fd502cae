use mealcart_shared::IngredientId;
use mealcart_shopping::{GroceryBoard, GroceryLine, Refresh};
use time::format_description::well_known::Rfc3339;

async fn board(config: &mealcart::Config) -> anyhow::Result<GroceryBoard> {
    let pool =
        mealcart::create_pool(&config.database.url, config.database.max_connections).await?;

    mealcart::open_board(pool, &config.grocery).await
}

pub async fn list(config: mealcart::Config, json: bool) -> anyhow::Result<()> {
    let board = board(&config).await?;

    let Refresh::Published(list) = board.refresh().await? else {
        anyhow::bail!("grocery list refresh was overtaken");
    };

    if json {
        println!("{}", serde_json::to_string_pretty(list.as_ref())?);
        return Ok(());
    }

    if list.is_empty() {
        println!("Nothing to buy this week.");
        return Ok(());
    }

    println!("To buy:");
    print_lines(&list.to_buy);

    if board.aggregator().tracks_bought() {
        println!();
        println!("Bought:");
        print_lines(&list.bought);
    }

    println!();
    println!("Updated {}", list.last_updated.format(&Rfc3339)?);

    Ok(())
}

pub async fn mark(config: mealcart::Config, id: IngredientId, bought: bool) -> anyhow::Result<()> {
    let board = board(&config).await?;

    if bought {
        board.mark_bought(&id).await?;
    } else {
        board.mark_unbought(&id).await?;
    }

    Ok(())
}

fn print_lines(lines: &[GroceryLine]) {
    if lines.is_empty() {
        println!("  (none)");
    }

    for line in lines {
        println!(
            "  [{}] {} - {}",
            line.ingredient_id,
            line.name,
            line.formatted_quantity()
        );
    }
}
