use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reservations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: Uuid,
    pub user_id: Uuid,
    // Nulled by the FK when the hotel or room type is deleted; the backup
    // name keeps the row presentable.
    pub hotel_id: Option<Uuid>,
    pub room_type_id: Option<Uuid>,
    pub check_in: Date,
    pub check_out: Date,
    pub room_count: i32,
    pub guest_count: i32,
    pub total_amount: i64,
    pub notes: Option<String>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: Option<String>,
    pub status: String,
    pub hotel_name_backup: Option<String>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::UserId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(
        belongs_to = "super::hotels::Entity",
        from = "Column::HotelId",
        to = "super::hotels::Column::Id"
    )]
    Hotels,
    #[sea_orm(
        belongs_to = "super::room_types::Entity",
        from = "Column::RoomTypeId",
        to = "super::room_types::Column::Id"
    )]
    RoomTypes,
    #[sea_orm(has_many = "super::contact_messages::Entity")]
    ContactMessages,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl Related<super::hotels::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hotels.def()
    }
}

impl Related<super::room_types::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RoomTypes.def()
    }
}

impl Related<super::contact_messages::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ContactMessages.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
