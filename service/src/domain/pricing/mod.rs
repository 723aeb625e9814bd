//! [`Pricing`] of a [`Property`].
//!
//! Pricing is shaped by the [`ListingMode`] of a [`Property`]: a `Buy`
//! property carries an asking price with the fees and percentages adding up
//! to its final price, while a `Rent` property carries its monthly rent and
//! security deposit only.
//!
//! [`Pricing::validate_and_compute()`] is the only way to build a [`Pricing`]
//! from client input, and it's used identically when a [`Property`] is
//! created and updated.

mod error;
pub mod field;
mod raw;

use common::{define_kind, Money, Percent};
use derive_more::From;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[cfg(doc)]
use crate::domain::Property;

pub use self::{
    error::{ErrorKind, ValidationError},
    raw::RawPricing,
};

define_kind! {
    #[doc = "Listing mode of a [`Property`]."]
    enum ListingMode {
        #[doc = "[`Property`] is offered for sale."]
        Buy = 1,

        #[doc = "[`Property`] is offered for lease."]
        Rent = 2,
    }
}

/// Pricing of a [`Property`], discriminated by its [`ListingMode`].
#[derive(Clone, Debug, Deserialize, Eq, From, PartialEq, Serialize)]
#[serde(tag = "listingMode")]
pub enum Pricing {
    /// [`Pricing`] of a [`Property`] offered for sale.
    Buy(Buy),

    /// [`Pricing`] of a [`Property`] offered for lease.
    Rent(Rent),
}

impl Pricing {
    /// Validates the provided `raw` pricing fields against the provided
    /// `listing_mode` and computes the derived fields.
    ///
    /// Caller-supplied derived fields ([`field::STAMP_DUTY_COST`],
    /// [`field::BROKER_COMMISSION_COST`], [`field::FINAL_PRICE`]) are never
    /// read.
    ///
    /// # Errors
    ///
    /// - [`ValidationError::InvalidMode`] if the `listing_mode` is neither
    ///   `Buy` nor `Rent`;
    /// - [`ValidationError::InvalidType`] if any field read by the listing
    ///   mode is not a number;
    /// - [`ValidationError::MissingRequiredField`] if a required field is
    ///   absent or not positive;
    /// - [`ValidationError::OutOfRange`] if a field is negative, or a
    ///   percentage is greater than `100`.
    pub fn validate_and_compute(
        listing_mode: &str,
        raw: &RawPricing,
    ) -> Result<Self, ValidationError> {
        let mode = listing_mode
            .parse::<ListingMode>()
            .map_err(|_| ValidationError::InvalidMode(listing_mode.into()))?;
        Self::compute(mode, raw)
    }

    /// Same as [`Pricing::validate_and_compute()`], but with an already
    /// parsed [`ListingMode`].
    ///
    /// # Errors
    ///
    /// See [`Pricing::validate_and_compute()`].
    pub fn compute(
        mode: ListingMode,
        raw: &RawPricing,
    ) -> Result<Self, ValidationError> {
        match mode {
            ListingMode::Buy => Buy::from_raw(raw).map(Self::Buy),
            ListingMode::Rent => Rent::from_raw(raw).map(Self::Rent),
        }
    }

    /// Returns [`ListingMode`] of this [`Pricing`].
    #[must_use]
    pub fn listing_mode(&self) -> ListingMode {
        match self {
            Self::Buy(_) => ListingMode::Buy,
            Self::Rent(_) => ListingMode::Rent,
        }
    }

    /// Returns the price a [`Property`] is listed for: the final price of a
    /// `Buy` property, or the monthly rent of a `Rent` one.
    #[must_use]
    pub fn listed_price(&self) -> Money {
        match self {
            Self::Buy(b) => b.final_price,
            Self::Rent(r) => r.rent_per_month,
        }
    }

    /// Returns the input fields this [`Pricing`] was computed from.
    ///
    /// Derived fields are not included.
    #[must_use]
    pub fn to_raw(&self) -> RawPricing {
        match self {
            Self::Buy(b) => RawPricing::new()
                .with(field::ASKING_PRICE, b.asking_price.to_string())
                .with(
                    field::STAMP_DUTY_PERCENTAGE,
                    b.stamp_duty_percentage.to_string(),
                )
                .with(field::ADVOCATE_FEE, b.advocate_fee.to_string())
                .with(field::RECEIPT_FEE, b.receipt_fee.to_string())
                .with(
                    field::BROKER_COMMISSION_PERCENTAGE,
                    b.broker_commission_percentage.to_string(),
                )
                .with(
                    field::PRICE_HISTORY,
                    b.price_history
                        .iter()
                        .map(|e| {
                            Value::Object(Map::from_iter([
                                (field::YEAR.into(), e.year.into()),
                                (field::COST.into(), e.cost.to_string().into()),
                            ]))
                        })
                        .collect::<Vec<_>>(),
                ),
            Self::Rent(r) => RawPricing::new()
                .with(field::RENT_PER_MONTH, r.rent_per_month.to_string())
                .with(
                    field::SECURITY_DEPOSIT,
                    r.security_deposit.to_string(),
                ),
        }
    }
}

/// [`Pricing`] of a [`Property`] offered for sale.
///
/// Stamp duty cost, broker commission cost and final price are derived from
/// the other fields on construction, so can never disagree with them.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(into = "BuyDocument", try_from = "BuyDocument")]
pub struct Buy {
    /// Price asked by the seller.
    asking_price: Money,

    /// Stamp duty, as a percentage of the asking price.
    stamp_duty_percentage: Percent,

    /// Fee of the advocate registering the sale.
    advocate_fee: Money,

    /// Fee for issuing the sale receipt.
    receipt_fee: Money,

    /// Broker commission, as a percentage of the asking price.
    broker_commission_percentage: Percent,

    /// Historical prices in the order they were entered.
    price_history: Vec<PriceHistoryEntry>,

    /// Derived stamp duty cost.
    stamp_duty_cost: Money,

    /// Derived broker commission cost.
    broker_commission_cost: Money,

    /// Derived final price.
    final_price: Money,
}

impl Buy {
    /// Creates a new [`Buy`] pricing computing its derived fields.
    ///
    /// [`None`] is returned if the computation overflows.
    #[must_use]
    pub fn new(
        asking_price: Money,
        stamp_duty_percentage: Percent,
        advocate_fee: Money,
        receipt_fee: Money,
        broker_commission_percentage: Percent,
        price_history: Vec<PriceHistoryEntry>,
    ) -> Option<Self> {
        let stamp_duty_cost = stamp_duty_percentage.of(asking_price)?;
        let broker_commission_cost =
            broker_commission_percentage.of(asking_price)?;
        let final_price = asking_price
            .checked_add(stamp_duty_cost)?
            .checked_add(broker_commission_cost)?
            .checked_add(advocate_fee)?
            .checked_add(receipt_fee)?;

        Some(Self {
            asking_price,
            stamp_duty_percentage,
            advocate_fee,
            receipt_fee,
            broker_commission_percentage,
            price_history,
            stamp_duty_cost,
            broker_commission_cost,
            final_price,
        })
    }

    /// Validates the `raw` fields of a [`Buy`] pricing.
    fn from_raw(raw: &RawPricing) -> Result<Self, ValidationError> {
        use ValidationError as E;

        let asking_price = raw.decimal(field::ASKING_PRICE)?;
        let stamp_duty_percentage =
            raw.decimal(field::STAMP_DUTY_PERCENTAGE)?;
        let advocate_fee = raw.decimal(field::ADVOCATE_FEE)?;
        let receipt_fee = raw.decimal(field::RECEIPT_FEE)?;
        let broker_commission_percentage =
            raw.decimal(field::BROKER_COMMISSION_PERCENTAGE)?;
        let price_history = raw.price_history()?;

        let asking_price = asking_price
            .filter(|p| *p > Decimal::ZERO)
            .and_then(Money::new)
            .ok_or_else(|| {
                E::MissingRequiredField(field::ASKING_PRICE.into())
            })?;
        let stamp_duty_percentage = optional_percent(
            field::STAMP_DUTY_PERCENTAGE,
            stamp_duty_percentage,
        )?;
        let advocate_fee = optional_money(field::ADVOCATE_FEE, advocate_fee)?;
        let receipt_fee = optional_money(field::RECEIPT_FEE, receipt_fee)?;
        let broker_commission_percentage = optional_percent(
            field::BROKER_COMMISSION_PERCENTAGE,
            broker_commission_percentage,
        )?;

        Self::new(
            asking_price,
            stamp_duty_percentage,
            advocate_fee,
            receipt_fee,
            broker_commission_percentage,
            price_history,
        )
        .ok_or_else(|| E::OutOfRange {
            field: field::ASKING_PRICE.into(),
            value: asking_price.amount(),
        })
    }

    /// Returns the asking price of this [`Buy`] pricing.
    #[must_use]
    pub fn asking_price(&self) -> Money {
        self.asking_price
    }

    /// Returns the stamp duty percentage of this [`Buy`] pricing.
    #[must_use]
    pub fn stamp_duty_percentage(&self) -> Percent {
        self.stamp_duty_percentage
    }

    /// Returns the stamp duty cost of this [`Buy`] pricing.
    #[must_use]
    pub fn stamp_duty_cost(&self) -> Money {
        self.stamp_duty_cost
    }

    /// Returns the advocate fee of this [`Buy`] pricing.
    #[must_use]
    pub fn advocate_fee(&self) -> Money {
        self.advocate_fee
    }

    /// Returns the receipt fee of this [`Buy`] pricing.
    #[must_use]
    pub fn receipt_fee(&self) -> Money {
        self.receipt_fee
    }

    /// Returns the broker commission percentage of this [`Buy`] pricing.
    #[must_use]
    pub fn broker_commission_percentage(&self) -> Percent {
        self.broker_commission_percentage
    }

    /// Returns the broker commission cost of this [`Buy`] pricing.
    #[must_use]
    pub fn broker_commission_cost(&self) -> Money {
        self.broker_commission_cost
    }

    /// Returns the final price of this [`Buy`] pricing.
    #[must_use]
    pub fn final_price(&self) -> Money {
        self.final_price
    }

    /// Returns the price history of this [`Buy`] pricing, in the order it
    /// was entered.
    #[must_use]
    pub fn price_history(&self) -> &[PriceHistoryEntry] {
        &self.price_history
    }
}

/// Stored shape of a [`Buy`] pricing.
///
/// Derived fields are written, but never read back.
#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct BuyDocument {
    asking_price: Money,
    #[serde(default)]
    stamp_duty_percentage: Percent,
    #[serde(default, skip_deserializing)]
    stamp_duty_cost: Money,
    #[serde(default)]
    advocate_fee: Money,
    #[serde(default)]
    receipt_fee: Money,
    #[serde(default)]
    broker_commission_percentage: Percent,
    #[serde(default, skip_deserializing)]
    broker_commission_cost: Money,
    #[serde(default, skip_deserializing)]
    final_price: Money,
    #[serde(default)]
    price_history: Vec<PriceHistoryEntry>,
}

impl From<Buy> for BuyDocument {
    fn from(buy: Buy) -> Self {
        let Buy {
            asking_price,
            stamp_duty_percentage,
            advocate_fee,
            receipt_fee,
            broker_commission_percentage,
            price_history,
            stamp_duty_cost,
            broker_commission_cost,
            final_price,
        } = buy;
        Self {
            asking_price,
            stamp_duty_percentage,
            stamp_duty_cost,
            advocate_fee,
            receipt_fee,
            broker_commission_percentage,
            broker_commission_cost,
            final_price,
            price_history,
        }
    }
}

impl TryFrom<BuyDocument> for Buy {
    type Error = &'static str;

    fn try_from(doc: BuyDocument) -> Result<Self, Self::Error> {
        if doc.asking_price == Money::ZERO {
            return Err("`Buy` pricing requires positive `askingPrice`");
        }
        Self::new(
            doc.asking_price,
            doc.stamp_duty_percentage,
            doc.advocate_fee,
            doc.receipt_fee,
            doc.broker_commission_percentage,
            doc.price_history,
        )
        .ok_or("`Buy` pricing overflows")
    }
}

/// [`Pricing`] of a [`Property`] offered for lease.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase", try_from = "RentDocument")]
pub struct Rent {
    /// Monthly rent, always positive.
    rent_per_month: Money,

    /// Security deposit paid upfront.
    security_deposit: Money,
}

impl Rent {
    /// Creates a new [`Rent`] pricing.
    ///
    /// [`None`] is returned if the `rent_per_month` is zero.
    #[must_use]
    pub fn new(rent_per_month: Money, security_deposit: Money) -> Option<Self> {
        (rent_per_month != Money::ZERO).then_some(Self {
            rent_per_month,
            security_deposit,
        })
    }

    /// Returns the monthly rent.
    #[must_use]
    pub fn rent_per_month(&self) -> Money {
        self.rent_per_month
    }

    /// Returns the security deposit.
    #[must_use]
    pub fn security_deposit(&self) -> Money {
        self.security_deposit
    }

    /// Validates the `raw` fields of a [`Rent`] pricing.
    fn from_raw(raw: &RawPricing) -> Result<Self, ValidationError> {
        use ValidationError as E;

        let rent_per_month = raw.decimal(field::RENT_PER_MONTH)?;
        let security_deposit = raw.decimal(field::SECURITY_DEPOSIT)?;

        let rent_per_month =
            required_money(field::RENT_PER_MONTH, rent_per_month)?;
        if rent_per_month == Money::ZERO {
            return Err(E::MissingRequiredField(field::RENT_PER_MONTH.into()));
        }
        let security_deposit =
            required_money(field::SECURITY_DEPOSIT, security_deposit)?;

        Ok(Self {
            rent_per_month,
            security_deposit,
        })
    }
}

/// Stored shape of a [`Rent`] pricing.
#[derive(Clone, Copy, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RentDocument {
    rent_per_month: Money,
    security_deposit: Money,
}

impl TryFrom<RentDocument> for Rent {
    type Error = &'static str;

    fn try_from(doc: RentDocument) -> Result<Self, Self::Error> {
        Self::new(doc.rent_per_month, doc.security_deposit)
            .ok_or("`Rent` pricing requires positive `rentPerMonth`")
    }
}

/// Entry of a [`Buy`] pricing history.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct PriceHistoryEntry {
    /// Year the [`Property`] was priced.
    pub year: i32,

    /// Price of the [`Property`] in that year.
    pub cost: Money,
}

/// Converts an optional monetary `value` of the provided `field`, defaulting
/// to zero.
fn optional_money(
    field: &str,
    value: Option<Decimal>,
) -> Result<Money, ValidationError> {
    value.map_or(Ok(Money::ZERO), |v| {
        Money::new(v).ok_or_else(|| out_of_range(field, v))
    })
}

/// Converts an optional percentage `value` of the provided `field`,
/// defaulting to zero.
fn optional_percent(
    field: &str,
    value: Option<Decimal>,
) -> Result<Percent, ValidationError> {
    value.map_or(Ok(Percent::ZERO), |v| {
        Percent::new(v).ok_or_else(|| out_of_range(field, v))
    })
}

/// Converts a required monetary `value` of the provided `field`.
fn required_money(
    field: &str,
    value: Option<Decimal>,
) -> Result<Money, ValidationError> {
    let v = value
        .ok_or_else(|| ValidationError::MissingRequiredField(field.into()))?;
    Money::new(v).ok_or_else(|| out_of_range(field, v))
}

fn out_of_range(field: &str, value: Decimal) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.into(),
        value,
    }
}

#[cfg(test)]
mod tests;
