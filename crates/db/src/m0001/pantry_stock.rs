use sea_query::{ColumnDef, Table, TableCreateStatement, TableDropStatement};

use crate::table::PantryStock;

pub struct CreateTable;

fn create_table() -> TableCreateStatement {
    Table::create()
        .table(PantryStock::Table)
        .col(
            ColumnDef::new(PantryStock::IngredientId)
                .string()
                .not_null()
                .primary_key(),
        )
        .col(ColumnDef::new(PantryStock::Quantity).double().not_null())
        .col(ColumnDef::new(PantryStock::Unit).string().null())
        .to_owned()
}

fn drop_table() -> TableDropStatement {
    Table::drop().table(PantryStock::Table).to_owned()
}

#[async_trait::async_trait]
impl sqlx_migrator::Operation<sqlx::Sqlite> for CreateTable {
    async fn up(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = create_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }

    async fn down(
        &self,
        connection: &mut sqlx::SqliteConnection,
    ) -> Result<(), sqlx_migrator::Error> {
        let statement = drop_table().to_string(sea_query::SqliteQueryBuilder);
        sqlx::query(&statement).execute(connection).await?;

        Ok(())
    }
}
