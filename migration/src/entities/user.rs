use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub name: String,
    pub surname: String,
    #[sea_orm(unique)]
    pub email: String,
    pub password: String,
    /// "A" = admin, "C" = customer
    pub role: String,
    pub picture: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    /// "H" / "T" / "D"
    pub needs: String,
    pub carte_id: Option<String>,
    pub certificat_scolaire: Option<String>,
    pub verified: bool,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
