//! [`Command`] for creating a new [`Property`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        pricing::{RawPricing, ValidationError},
        property, Pricing, Property,
    },
    infra::{database, Database},
    Service,
};

use super::Command;

/// [`Command`] for creating a new [`Property`].
#[derive(Clone, Debug)]
pub struct CreateProperty {
    /// [`property::Title`] of a new [`Property`].
    pub title: property::Title,

    /// [`property::Description`] of a new [`Property`], if any.
    pub description: Option<property::Description>,

    /// [`property::Location`] of a new [`Property`].
    pub location: property::Location,

    /// [`property::Khatauni`] of a new [`Property`].
    pub khatauni: property::Khatauni,

    /// [`property::Khasra`] of a new [`Property`].
    pub khasra: property::Khasra,

    /// Listing mode a new [`Property`] is listed for, as requested.
    pub listing_mode: String,

    /// Raw [`Pricing`] fields of a new [`Property`], as requested.
    pub pricing: RawPricing,
}

impl<Db> Command<CreateProperty> for Service<Db>
where
    Db: Database<Insert<Property>, Ok = (), Err = Traced<database::Error>>,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: CreateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let CreateProperty {
            title,
            description,
            location,
            khatauni,
            khasra,
            listing_mode,
            pricing,
        } = cmd;

        let pricing = Pricing::validate_and_compute(&listing_mode, &pricing)
            .inspect_err(|e| {
                log::debug!("rejected pricing of a new `Property`: {e}");
            })
            .map_err(tracerr::from_and_wrap!(=> E))?;

        let now = DateTime::now();
        let property = Property {
            id: property::Id::new(),
            title,
            description,
            location,
            khatauni,
            khasra,
            pricing,
            created_at: now.coerce(),
            updated_at: now.coerce(),
        };

        self.database()
            .execute(Insert(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        log::info!(
            "`Property(id: {})` created for `{}`",
            property.id,
            property.listing_mode(),
        );

        Ok(property)
    }
}

/// Error of [`CreateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Pricing`] is invalid.
    #[display("Invalid `Pricing`: {_0}")]
    Pricing(ValidationError),
}
