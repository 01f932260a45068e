//! Generated content database entity for SeaORM.

use sea_orm::entity::prelude::*;

use crate::domain::GeneratedContent;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "generatedcontent")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub user_id: i32,
    pub content_type: String,
    pub title: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub text: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub image_path: Option<String>,
    #[sea_orm(column_type = "JsonBinary", nullable)]
    pub metadata: Option<Json>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for GeneratedContent {
    fn from(model: Model) -> Self {
        GeneratedContent {
            id: model.id,
            user_id: model.user_id,
            content_type: model.content_type,
            title: model.title,
            text: model.text,
            image_path: model.image_path,
            metadata: model.metadata,
            created_at: model.created_at,
        }
    }
}
