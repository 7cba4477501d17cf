use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::category::{Category as DomainCategory, NewCategory as DomainNewCategory};
use crate::domain::types::{CategoryId, CategoryName, TypeConstraintError};

/// Diesel model representing the `categories` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::categories)]
pub struct Category {
    pub id: String,
    pub name: String,
    pub display_order: i32,
    pub total_rooms: i32,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Category`]. `created_at` is filled by the database.
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::categories)]
pub struct NewCategory {
    pub id: String,
    pub name: String,
    pub display_order: i32,
    pub total_rooms: i32,
}

impl NewCategory {
    pub fn with_id(id: CategoryId, category: &DomainNewCategory) -> Self {
        Self {
            id: id.into_inner(),
            name: category.name.as_str().to_string(),
            display_order: category.display_order.get(),
            total_rooms: category.total_rooms.get(),
        }
    }
}

impl TryFrom<Category> for DomainCategory {
    type Error = TypeConstraintError;

    fn try_from(category: Category) -> Result<Self, Self::Error> {
        Ok(Self {
            id: CategoryId::new(category.id)?,
            name: CategoryName::new(category.name)?,
            display_order: category.display_order.try_into()?,
            total_rooms: category.total_rooms.try_into()?,
            created_at: category.created_at,
        })
    }
}
