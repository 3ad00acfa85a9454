use chrono::Utc;
use sea_orm::{ActiveValue, DatabaseTransaction, QueryOrder, TransactionTrait, prelude::*};

use crate::{Client, EngineError, ResultEngine, clients, orders::require_positive_id};

use super::{Engine, normalize_optional_text, normalize_required_text, with_tx};

impl Engine {
    /// Registers a new client and returns its id.
    pub async fn new_client(
        &self,
        name: &str,
        phone: Option<&str>,
        notes: Option<&str>,
    ) -> ResultEngine<i64> {
        let name = normalize_required_text(name, "client name")?;
        with_tx!(self, |db_tx| {
            let model = clients::ActiveModel {
                id: ActiveValue::NotSet,
                name: ActiveValue::Set(name),
                phone: ActiveValue::Set(normalize_optional_text(phone)),
                notes: ActiveValue::Set(normalize_optional_text(notes)),
                created_at: ActiveValue::Set(Utc::now()),
            }
            .insert(&db_tx)
            .await?;
            tracing::info!(client_id = model.id, "client created");
            Ok(model.id)
        })
    }

    pub async fn client(&self, client_id: i64) -> ResultEngine<Client> {
        require_positive_id(client_id, "client")?;
        with_tx!(self, |db_tx| {
            let model = self.require_client(&db_tx, client_id).await?;
            Ok(Client::from(model))
        })
    }

    /// All clients, by name.
    pub async fn clients(&self) -> ResultEngine<Vec<Client>> {
        with_tx!(self, |db_tx| {
            let models = clients::Entity::find()
                .order_by_asc(clients::Column::Name)
                .order_by_asc(clients::Column::Id)
                .all(&db_tx)
                .await?;
            Ok(models.into_iter().map(Client::from).collect::<Vec<_>>())
        })
    }

    pub(super) async fn require_client(
        &self,
        db_tx: &DatabaseTransaction,
        client_id: i64,
    ) -> ResultEngine<clients::Model> {
        clients::Entity::find_by_id(client_id)
            .one(db_tx)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound("client not exists".to_string()))
    }
}
