use std::collections::HashMap;

use async_trait::async_trait;
use sea_orm::prelude::*;
use sea_orm::Iterable;

use itertools::Itertools;


fn int_key(value: sea_orm::Value) -> Option<i32> {
    match value {
        sea_orm::Value::Int(Some(val)) => Some(val),
        _ => None
    }
}

/// Loads rows by primary key. The result has one entry per requested id,
/// in request order, with `None` for ids that do not exist.
pub async fn load_many<E, Conn>(db: &Conn, ids: Vec<i32>) -> Result<Vec<Option<E::Model>>, DbErr> where E: EntityTrait, Conn: ConnectionTrait {
    let keys : Vec<E::Column> = E::PrimaryKey::iter().map(|e| e.into_column()).collect();

    if keys.len() != 1 {
        return Err(DbErr::Custom("load_many only supports entities with a single primary key".into()));
    }

    let key = keys[0];

    if ids.is_empty() {
        return Ok(vec![]);
    }

    let models = E::find()
        .filter(key.is_in(ids.iter().unique().cloned().collect_vec()))
        .all(db)
        .await?;

    let by_id = models.into_iter().filter_map(|model| {
        int_key(model.get(key)).map(|id| (id, model))
    }).collect::<HashMap<i32, E::Model>>();

    Ok(ids.into_iter().map(|id| {
        by_id.get(&id).cloned()
    }).collect_vec())
}


#[async_trait]
pub trait BatchLoad {
    type M;

    async fn batch_load<Conn>(db: &Conn, ids: Vec<i32>) -> Result<Vec<Option<Self::M>>, DbErr> where Conn: ConnectionTrait;

    /// Like `batch_load`, but keyed by id and without missing rows.
    async fn batch_load_map<Conn>(db: &Conn, ids: Vec<i32>) -> Result<HashMap<i32, Self::M>, DbErr> where Conn: ConnectionTrait {
        let unique_ids = ids.into_iter().unique().collect_vec();
        let models = Self::batch_load(db, unique_ids.clone()).await?;

        Ok(unique_ids.into_iter().zip(models.into_iter()).filter_map(|(id, model)| {
            model.map(|m| (id, m))
        }).collect())
    }
}

#[async_trait]
impl<E2: EntityTrait> BatchLoad for E2 {
    type M = E2::Model;

    async fn batch_load<Conn>(db: &Conn, ids: Vec<i32>) -> Result<Vec<Option<Self::M>>, DbErr> where Conn: ConnectionTrait {
        load_many::<E2, Conn>(db, ids).await
    }
}
