//! In-process document store [`Database`] implementation.

use std::{
    collections::BTreeMap,
    io, mem,
    ops::Bound,
    path::{Path, PathBuf},
    sync::Arc,
};

use common::operations::{By, Delete, Insert, Select, Update};
use derive_more::{Display, Error as StdError, From};
use tokio::{fs, sync::RwLock};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{property, Property},
    infra::{database, Database},
    read::property::list,
};

/// Collection of [`Property`] documents, ordered by their IDs.
type Documents = BTreeMap<property::Id, Property>;

/// In-process document store, optionally persisted into a JSON snapshot
/// file.
///
/// Every write replaces whole documents, so concurrent writes of the same
/// [`Property`] resolve as "last write wins". A write whose snapshot fails is
/// rolled back.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Stored [`Property`] documents.
    documents: Arc<RwLock<Documents>>,

    /// Path of the JSON snapshot file, if any.
    snapshot: Option<Arc<Path>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] store, which is never persisted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a [`Memory`] store persisted into the provided `snapshot` file,
    /// loading the documents it already contains.
    ///
    /// A missing `snapshot` file is created on the first write.
    ///
    /// # Errors
    ///
    /// If the `snapshot` file cannot be read or is malformed.
    pub async fn open(
        snapshot: impl Into<PathBuf>,
    ) -> Result<Self, Traced<database::Error>> {
        let snapshot = snapshot.into();

        let documents = match fs::read(&snapshot).await {
            Ok(bytes) => serde_json::from_slice::<Vec<Property>>(&bytes)
                .map_err(tracerr::from_and_wrap!(=> Error))
                .map_err(tracerr::map_from)?
                .into_iter()
                .map(|p| (p.id, p))
                .collect(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Documents::new(),
            Err(e) => {
                return Err(tracerr::new!(database::Error::from(Error::Io(e))));
            }
        };
        log::debug!(
            "loaded {} `Property` documents from `{}`",
            documents.len(),
            snapshot.display(),
        );

        Ok(Self {
            documents: Arc::new(RwLock::new(documents)),
            snapshot: Some(snapshot.into()),
        })
    }

    /// Persists the provided `documents` into the snapshot file, if any.
    ///
    /// The snapshot is written into a sibling temporary file first, and then
    /// renamed over the previous one.
    async fn persist(
        &self,
        documents: &Documents,
    ) -> Result<(), Traced<database::Error>> {
        let Some(snapshot) = &self.snapshot else {
            return Ok(());
        };

        let bytes = serde_json::to_vec_pretty(
            &documents.values().collect::<Vec<_>>(),
        )
        .map_err(tracerr::from_and_wrap!(=> Error))
        .map_err(tracerr::map_from)?;

        let tmp = snapshot.with_extension("tmp");
        fs::write(&tmp, bytes)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        fs::rename(&tmp, snapshot)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// [`Memory`] database [`Error`].
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    /// Snapshot file I/O error.
    #[display("Snapshot I/O failed: {_0}")]
    Io(io::Error),

    /// Snapshot file (de)serialization error.
    #[display("Malformed snapshot: {_0}")]
    Json(serde_json::Error),

    /// [`Property`] with the same ID is stored already.
    #[display("`Property(id: {_0})` already exists")]
    #[from(ignore)]
    AlreadyExists(#[error(not(source))] property::Id),
}

impl Database<Insert<Property>> for Memory {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(property): Insert<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut documents = self.documents.write().await;
        if documents.contains_key(&property.id) {
            return Err(tracerr::new!(database::Error::from(
                Error::AlreadyExists(property.id)
            )));
        }

        let id = property.id;
        _ = documents.insert(id, property);
        let persisted = self.persist(&documents).await;
        if persisted.is_err() {
            _ = documents.remove(&id);
        }
        persisted.map_err(tracerr::wrap!())
    }
}

impl Database<Update<Property>> for Memory {
    /// Indicator whether the [`Property`] was stored and got replaced.
    type Ok = bool;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(property): Update<Property>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut documents = self.documents.write().await;
        let Some(stored) = documents.get_mut(&property.id) else {
            return Ok(false);
        };

        let previous = mem::replace(stored, property);
        let persisted = self.persist(&documents).await;
        if persisted.is_err() {
            _ = documents.insert(previous.id, previous);
        }
        persisted.map_err(tracerr::wrap!()).map(|()| true)
    }
}

impl Database<Delete<By<Option<Property>, property::Id>>> for Memory {
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Delete(by): Delete<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut documents = self.documents.write().await;
        let Some(removed) = documents.remove(by.inner()) else {
            return Ok(None);
        };

        match self.persist(&documents).await {
            Ok(()) => Ok(Some(removed)),
            Err(e) => {
                _ = documents.insert(removed.id, removed);
                Err(tracerr::wrap!()(e))
            }
        }
    }
}

impl Database<Select<By<Option<Property>, property::Id>>> for Memory {
    type Ok = Option<Property>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Property>, property::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.documents.read().await.get(by.inner()).cloned())
    }
}

impl Database<Select<By<list::Page, list::Selector>>> for Memory {
    type Ok = list::Page;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::Page, list::Selector>>,
    ) -> Result<Self::Ok, Self::Err> {
        let list::Selector { arguments, filter } = by.into_inner();
        let limit = arguments.limit();

        let documents = self.documents.read().await;
        let mut edges = match arguments {
            list::Arguments::Forward { after, .. } => documents
                .range((
                    after.map_or(Bound::Unbounded, Bound::Excluded),
                    Bound::Unbounded,
                ))
                .map(|(_, p)| p)
                .filter(|p| filter.matches(p))
                .take(limit.saturating_add(1))
                .map(|p| (p.id, p.clone()))
                .collect::<Vec<_>>(),
            list::Arguments::Backward { before, .. } => documents
                .range((
                    Bound::Unbounded,
                    before.map_or(Bound::Unbounded, Bound::Excluded),
                ))
                .rev()
                .map(|(_, p)| p)
                .filter(|p| filter.matches(p))
                .take(limit.saturating_add(1))
                .map(|p| (p.id, p.clone()))
                .collect::<Vec<_>>(),
        };
        drop(documents);

        let has_more = edges.len() > limit;
        edges.truncate(limit);
        if arguments.kind().is_backward() {
            edges.reverse();
        }

        Ok(list::Page::new(&arguments, edges, has_more))
    }
}

impl Database<Select<By<list::TotalCount, list::Filter>>> for Memory {
    type Ok = list::TotalCount;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<list::TotalCount, list::Filter>>,
    ) -> Result<Self::Ok, Self::Err> {
        let filter = by.into_inner();
        Ok(self
            .documents
            .read()
            .await
            .values()
            .filter(|p| filter.matches(p))
            .count()
            .into())
    }
}
