//! [`Query`] collection related to the multiple [`Property`]s.

use common::operations::By;

use crate::read::property::list;
#[cfg(doc)]
use crate::{domain::Property, Query};

use super::DatabaseQuery;

/// Queries a [`list::Page`] of [`Property`]s.
pub type List = DatabaseQuery<By<list::Page, list::Selector>>;

/// Queries total count of [`Property`] list items passing a [`list::Filter`].
pub type TotalCount = DatabaseQuery<By<list::TotalCount, list::Filter>>;
