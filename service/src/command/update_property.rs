//! [`Command`] for updating an existing [`Property`].

use common::{
    operations::{By, Select, Update},
    DateTime,
};
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

/// [`Command`] for updating an existing [`Property`].
///
/// Only the provided attributes are changed. [`Pricing`] is always
/// recomputed from the stored fields overlaid with the provided ones.
#[derive(Clone, Debug, Default)]
pub struct UpdateProperty {
    /// ID of the [`Property`] to be updated.
    pub id: property::Id,

    /// New [`property::Title`] of the [`Property`].
    pub title: Option<property::Title>,

    /// New [`property::Description`] of the [`Property`].
    ///
    /// `Some(None)` removes the current one.
    pub description: Option<Option<property::Description>>,

    /// New [`property::Location`] of the [`Property`].
    pub location: Option<property::Location>,

    /// New [`property::Khatauni`] of the [`Property`].
    pub khatauni: Option<property::Khatauni>,

    /// New [`property::Khasra`] of the [`Property`].
    pub khasra: Option<property::Khasra>,

    /// New listing mode of the [`Property`], as requested.
    pub listing_mode: Option<String>,

    /// Raw [`Pricing`] fields to overlay the stored ones with, as requested.
    pub pricing: RawPricing,
}

impl<Db> Command<UpdateProperty> for Service<Db>
where
    Db: Database<
            Select<By<Option<Property>, property::Id>>,
            Ok = Option<Property>,
            Err = Traced<database::Error>,
        > + Database<
            Update<Property>,
            Ok = bool,
            Err = Traced<database::Error>,
        >,
{
    type Ok = Property;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        cmd: UpdateProperty,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let UpdateProperty {
            id,
            title,
            description,
            location,
            khatauni,
            khasra,
            listing_mode,
            pricing,
        } = cmd;

        let mut property = self
            .database()
            .execute(Select(By::<Option<Property>, _>::new(id)))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?
            .ok_or(E::PropertyNotExists(id))
            .map_err(tracerr::wrap!())?;

        let mut fields = property.pricing.to_raw();
        fields.merge(pricing);
        property.pricing = match &listing_mode {
            Some(mode) => Pricing::validate_and_compute(mode, &fields),
            None => Pricing::compute(property.listing_mode(), &fields),
        }
        .inspect_err(|e| {
            log::debug!("rejected pricing of `Property(id: {id})`: {e}");
        })
        .map_err(tracerr::from_and_wrap!(=> E))?;

        if let Some(title) = title {
            property.title = title;
        }
        if let Some(description) = description {
            property.description = description;
        }
        if let Some(location) = location {
            property.location = location;
        }
        if let Some(khatauni) = khatauni {
            property.khatauni = khatauni;
        }
        if let Some(khasra) = khasra {
            property.khasra = khasra;
        }
        property.updated_at = DateTime::now().coerce();

        let updated = self
            .database()
            .execute(Update(property.clone()))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;
        if !updated {
            // Deleted concurrently.
            return Err(tracerr::new!(E::PropertyNotExists(id)));
        }
        log::info!(
            "`Property(id: {id})` updated for `{}`",
            property.listing_mode(),
        );

        Ok(property)
    }
}

/// Error of [`UpdateProperty`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Database`] error.
    #[display("`Database` operation failed: {_0}")]
    Db(database::Error),

    /// [`Pricing`] is invalid.
    #[display("Invalid `Pricing`: {_0}")]
    Pricing(ValidationError),

    /// [`Property`] doesn't exist.
    #[display("`Property(id: {_0})` does not exist")]
    #[from(ignore)]
    PropertyNotExists(#[error(not(source))] property::Id),
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use serde_json::json;

    use crate::{
        command::CreateProperty,
        domain::{
            pricing::{ErrorKind, ListingMode, RawPricing},
            property, Pricing, Property,
        },
        infra::Memory,
        Command as _, Config, Service,
    };

    use super::{ExecutionError, UpdateProperty};

    fn raw(fields: serde_json::Value) -> RawPricing {
        serde_json::from_value(fields).unwrap()
    }

    async fn buy(svc: &Service<Memory>) -> Property {
        svc.execute(CreateProperty {
            title: property::Title::new("Plot").unwrap(),
            description: property::Description::new("Corner plot"),
            location: property::Location::new("Noida").unwrap(),
            khatauni: property::Khatauni::new("7").unwrap(),
            khasra: property::Khasra::new("44").unwrap(),
            listing_mode: "Buy".into(),
            pricing: raw(json!({
                "askingPrice": 1_000_000,
                "stampDutyPercentage": 5,
                "advocateFee": 10_000,
                "priceHistory": [{"year": 2020, "cost": 800_000}],
            })),
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn recomputes_merged_pricing() {
        let svc = Service::new(Config::default(), Memory::new());
        let created = buy(&svc).await;

        let updated = svc
            .execute(UpdateProperty {
                id: created.id,
                title: property::Title::new("Corner plot"),
                pricing: raw(json!({
                    "askingPrice": "2000000",
                    "finalPrice": 5,
                })),
                ..UpdateProperty::default()
            })
            .await
            .unwrap();

        let Pricing::Buy(pricing) = &updated.pricing else {
            panic!("expected `Buy` pricing");
        };
        assert_eq!(pricing.stamp_duty_cost().amount(), dec!(100000));
        assert_eq!(pricing.advocate_fee().amount(), dec!(10000));
        assert_eq!(pricing.final_price().amount(), dec!(2110000));
        assert_eq!(pricing.price_history().len(), 1);
        assert_eq!(updated.title.to_string(), "Corner plot");
        assert_eq!(updated.description, created.description);
        assert_eq!(updated.created_at, created.created_at);
    }

    #[tokio::test]
    async fn switches_listing_mode() {
        let svc = Service::new(Config::default(), Memory::new());
        let created = buy(&svc).await;

        let updated = svc
            .execute(UpdateProperty {
                id: created.id,
                description: Some(None),
                listing_mode: Some("Rent".into()),
                pricing: raw(json!({
                    "rentPerMonth": 23_000,
                    "securityDeposit": 50_000,
                })),
                ..UpdateProperty::default()
            })
            .await
            .unwrap();

        assert_eq!(updated.listing_mode(), ListingMode::Rent);
        assert_eq!(updated.description, None);
        assert_eq!(updated.pricing.listed_price().amount(), dec!(23000));
    }

    #[tokio::test]
    async fn rejects_invalid_merged_pricing() {
        let svc = Service::new(Config::default(), Memory::new());
        let created = buy(&svc).await;

        let err = svc
            .execute(UpdateProperty {
                id: created.id,
                listing_mode: Some("Rent".into()),
                pricing: raw(json!({"rentPerMonth": 23_000})),
                ..UpdateProperty::default()
            })
            .await
            .unwrap_err();
        let ExecutionError::Pricing(e) = err.as_ref() else {
            panic!("expected `Pricing` error, found: {err}");
        };
        assert_eq!(e.kind(), ErrorKind::MissingRequiredField);
        assert_eq!(e.field(), Some("securityDeposit"));

        let err = svc
            .execute(UpdateProperty {
                id: created.id,
                pricing: raw(json!({"askingPrice": null})),
                ..UpdateProperty::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::Pricing(e)
                if e.kind() == ErrorKind::MissingRequiredField,
        ));
    }

    #[tokio::test]
    async fn fails_on_absent_property() {
        let svc = Service::new(Config::default(), Memory::new());
        let id = property::Id::new();

        let err = svc
            .execute(UpdateProperty {
                id,
                ..UpdateProperty::default()
            })
            .await
            .unwrap_err();
        assert!(matches!(
            err.as_ref(),
            ExecutionError::PropertyNotExists(i) if *i == id,
        ));
    }
}
