use sea_orm::{ActiveValue, QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Category, EngineError, ResultEngine, categories,
    util::{normalize_category_display, normalize_category_key},
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a category for a user.
    ///
    /// Names are deduplicated on their normalized key, so "Café" and "cafe"
    /// collide. Categories created with `is_fixed` mark their expenses as
    /// fixed recurring bills.
    pub async fn create_category(
        &self,
        user_id: &str,
        name: &str,
        is_fixed: bool,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let display = normalize_category_display(name)?;
            let name_norm = normalize_category_key(&display)?;

            let clash = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                .one(&db_tx)
                .await?;
            if clash.is_some() {
                return Err(EngineError::ExistingKey(display));
            }

            let category = Category {
                id: Uuid::new_v4(),
                user_id: user_id.to_string(),
                name: display,
                name_norm,
                is_fixed,
                archived: false,
            };
            categories::ActiveModel::from(&category).insert(&db_tx).await?;
            Ok(category)
        })
    }

    /// List a user's categories, alphabetically by normalized name.
    pub async fn list_categories(
        &self,
        user_id: &str,
        include_archived: bool,
    ) -> ResultEngine<Vec<Category>> {
        with_tx!(self, |db_tx| {
            self.require_user_exists(&db_tx, user_id).await?;
            let mut query = categories::Entity::find()
                .filter(categories::Column::UserId.eq(user_id.to_string()))
                .order_by_asc(categories::Column::NameNorm);
            if !include_archived {
                query = query.filter(categories::Column::Archived.eq(false));
            }
            let models = query.all(&db_tx).await?;
            Ok(models.into_iter().map(Category::from).collect())
        })
    }

    /// Rename a category and/or flip its `is_fixed` / `archived` flags.
    /// `None` fields are left unchanged. Archiving keeps the row so old
    /// expenses stay labeled.
    pub async fn update_category(
        &self,
        user_id: &str,
        category_id: Uuid,
        name: Option<&str>,
        is_fixed: Option<bool>,
        archived: Option<bool>,
    ) -> ResultEngine<Category> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_category_owned(&db_tx, user_id, category_id)
                .await?;
            if name.is_none() && is_fixed.is_none() && archived.is_none() {
                Ok(Category::from(model))
            } else {
                let mut active: categories::ActiveModel = model.into();
                if let Some(name) = name {
                    let display = normalize_category_display(name)?;
                    let name_norm = normalize_category_key(&display)?;
                    let clash = categories::Entity::find()
                        .filter(categories::Column::UserId.eq(user_id.to_string()))
                        .filter(categories::Column::NameNorm.eq(name_norm.clone()))
                        .filter(categories::Column::Id.ne(category_id))
                        .one(&db_tx)
                        .await?;
                    if clash.is_some() {
                        return Err(EngineError::ExistingKey(display));
                    }
                    active.name = ActiveValue::Set(display);
                    active.name_norm = ActiveValue::Set(name_norm);
                }
                if let Some(is_fixed) = is_fixed {
                    active.is_fixed = ActiveValue::Set(is_fixed);
                }
                if let Some(archived) = archived {
                    active.archived = ActiveValue::Set(archived);
                }
                let updated = active.update(&db_tx).await?;
                Ok(Category::from(updated))
            }
        })
    }
}
