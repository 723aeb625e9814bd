//! Names of [`Pricing`] fields as they appear in requests and documents.

#[cfg(doc)]
use super::Pricing;

/// Listing mode discriminant.
pub const LISTING_MODE: &str = "listingMode";

/// Asking price of a `Buy` property.
pub const ASKING_PRICE: &str = "askingPrice";

/// Stamp duty percentage of a `Buy` property.
pub const STAMP_DUTY_PERCENTAGE: &str = "stampDutyPercentage";

/// Derived stamp duty cost of a `Buy` property.
pub const STAMP_DUTY_COST: &str = "stampDutyCost";

/// Advocate fee of a `Buy` property.
pub const ADVOCATE_FEE: &str = "advocateFee";

/// Receipt fee of a `Buy` property.
pub const RECEIPT_FEE: &str = "receiptFee";

/// Broker commission percentage of a `Buy` property.
pub const BROKER_COMMISSION_PERCENTAGE: &str = "brokerCommissionPercentage";

/// Derived broker commission cost of a `Buy` property.
pub const BROKER_COMMISSION_COST: &str = "brokerCommissionCost";

/// Derived final price of a `Buy` property.
pub const FINAL_PRICE: &str = "finalPrice";

/// Price history of a `Buy` property.
pub const PRICE_HISTORY: &str = "priceHistory";

/// Year of a price history entry.
pub const YEAR: &str = "year";

/// Cost of a price history entry.
pub const COST: &str = "cost";

/// Monthly rent of a `Rent` property.
pub const RENT_PER_MONTH: &str = "rentPerMonth";

/// Security deposit of a `Rent` property.
pub const SECURITY_DEPOSIT: &str = "securityDeposit";
