use common::Money;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::{json, Value};

use super::{
    ErrorKind, ListingMode, Pricing, RawPricing, Rent, ValidationError,
};

fn raw(fields: Value) -> RawPricing {
    serde_json::from_value(fields).unwrap()
}

fn buy(fields: Value) -> super::Buy {
    match Pricing::validate_and_compute("Buy", &raw(fields)).unwrap() {
        Pricing::Buy(b) => b,
        Pricing::Rent(_) => panic!("expected `Buy` pricing"),
    }
}

mod buy {
    use super::*;

    #[test]
    fn computes_derived_fields() {
        let pricing = buy(json!({
            "askingPrice": 7_700_000,
            "stampDutyPercentage": 5,
            "advocateFee": 15_000,
            "receiptFee": 25_000,
            "brokerCommissionPercentage": 2,
        }));

        assert_eq!(pricing.stamp_duty_cost().amount(), dec!(385000));
        assert_eq!(pricing.broker_commission_cost().amount(), dec!(154000));
        assert_eq!(pricing.final_price().amount(), dec!(8279000));
    }

    #[test]
    fn defaults_optional_fields_to_zero() {
        let pricing = buy(json!({"askingPrice": "2500000"}));

        assert_eq!(pricing.stamp_duty_cost().amount(), Decimal::ZERO);
        assert_eq!(pricing.advocate_fee().amount(), Decimal::ZERO);
        assert_eq!(pricing.receipt_fee().amount(), Decimal::ZERO);
        assert_eq!(pricing.broker_commission_cost().amount(), Decimal::ZERO);
        assert_eq!(pricing.final_price().amount(), dec!(2500000));
        assert!(pricing.price_history().is_empty());
    }

    #[test]
    fn coerces_form_strings() {
        let from_strings = buy(json!({
            "askingPrice": "7700000",
            "stampDutyPercentage": "5",
            "advocateFee": "15000",
            "receiptFee": "25000",
            "brokerCommissionPercentage": "2",
        }));
        let from_numbers = buy(json!({
            "askingPrice": 7_700_000,
            "stampDutyPercentage": 5,
            "advocateFee": 15_000,
            "receiptFee": 25_000,
            "brokerCommissionPercentage": 2,
        }));

        assert_eq!(from_strings, from_numbers);
    }

    #[test]
    fn ignores_caller_supplied_derived_fields() {
        let honest = buy(json!({
            "askingPrice": 1_000_000,
            "stampDutyPercentage": 6,
        }));
        let forged = buy(json!({
            "askingPrice": 1_000_000,
            "stampDutyPercentage": 6,
            "stampDutyCost": 1,
            "brokerCommissionCost": 999_999,
            "finalPrice": 5,
        }));

        assert_eq!(honest, forged);
        assert_eq!(forged.stamp_duty_cost().amount(), dec!(60000));
        assert_eq!(forged.final_price().amount(), dec!(1060000));
    }

    #[test]
    fn ignores_unknown_and_rent_fields() {
        let pricing = buy(json!({
            "askingPrice": 100,
            "rentPerMonth": "not a number",
            "khasra": "12/4",
        }));

        assert_eq!(pricing.final_price().amount(), dec!(100));
    }

    #[test]
    fn requires_positive_asking_price() {
        for fields in [
            json!({}),
            json!({"askingPrice": 0}),
            json!({"askingPrice": "-10"}),
            json!({"askingPrice": ""}),
            json!({"askingPrice": null}),
        ] {
            assert_eq!(
                Pricing::validate_and_compute("Buy", &raw(fields)),
                Err(ValidationError::MissingRequiredField(
                    "askingPrice".into(),
                )),
            );
        }
    }

    #[test]
    fn rejects_percentage_over_hundred() {
        let err = Pricing::validate_and_compute(
            "Buy",
            &raw(json!({
                "askingPrice": 1_000_000,
                "stampDutyPercentage": 150,
            })),
        )
        .unwrap_err();

        assert_eq!(
            err,
            ValidationError::OutOfRange {
                field: "stampDutyPercentage".into(),
                value: dec!(150),
            },
        );
        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.field(), Some("stampDutyPercentage"));
    }

    #[test]
    fn accepts_hundred_percent() {
        let pricing = buy(json!({
            "askingPrice": 100,
            "brokerCommissionPercentage": 100,
        }));

        assert_eq!(pricing.final_price().amount(), dec!(200));
    }

    #[test]
    fn rejects_negative_values() {
        for (field, value) in [
            ("advocateFee", json!(-1)),
            ("receiptFee", json!("-0.5")),
            ("brokerCommissionPercentage", json!(-2)),
        ] {
            let mut fields = json!({"askingPrice": 100});
            fields[field] = value;

            let err = Pricing::validate_and_compute("Buy", &raw(fields))
                .unwrap_err();
            assert_eq!(err.kind(), ErrorKind::OutOfRange, "{field}");
            assert_eq!(err.field(), Some(field));
        }
    }

    #[test]
    fn reports_uncoercible_fields_before_missing_ones() {
        assert_eq!(
            Pricing::validate_and_compute(
                "Buy",
                &raw(json!({"stampDutyPercentage": "five"})),
            ),
            Err(ValidationError::InvalidType("stampDutyPercentage".into())),
        );
        assert_eq!(
            Pricing::validate_and_compute(
                "Buy",
                &raw(json!({"askingPrice": true})),
            ),
            Err(ValidationError::InvalidType("askingPrice".into())),
        );
    }

    #[test]
    fn preserves_price_history_order() {
        let pricing = buy(json!({
            "askingPrice": 5_500_000,
            "priceHistory": [
                {"year": 2024, "cost": 5_000_000},
                {"year": 2021, "cost": 2_000_000},
                {"year": 2024, "cost": 5_000_000},
            ],
        }));

        let years = pricing
            .price_history()
            .iter()
            .map(|e| e.year)
            .collect::<Vec<_>>();
        assert_eq!(years, [2024, 2021, 2024]);
        assert_eq!(pricing.price_history()[1].cost.amount(), dec!(2000000));
    }

    #[test]
    fn reports_invalid_price_history_entry() {
        assert_eq!(
            Pricing::validate_and_compute(
                "Buy",
                &raw(json!({
                    "askingPrice": 100,
                    "priceHistory": [
                        {"year": 2020, "cost": 10},
                        {"year": 2021, "cost": 20},
                        {"year": "soon", "cost": 30},
                    ],
                })),
            ),
            Err(ValidationError::InvalidType("priceHistory[2].year".into())),
        );
    }

    #[test]
    fn overflow_is_out_of_range() {
        let err = Pricing::validate_and_compute(
            "Buy",
            &raw(json!({
                "askingPrice": Decimal::MAX.to_string(),
                "stampDutyPercentage": 50,
            })),
        )
        .unwrap_err();

        assert_eq!(err.kind(), ErrorKind::OutOfRange);
        assert_eq!(err.field(), Some("askingPrice"));
    }
}

mod rent {
    use super::*;

    #[test]
    fn passes_fields_through() {
        let pricing = Pricing::validate_and_compute(
            "Rent",
            &raw(json!({"rentPerMonth": 23_000, "securityDeposit": 50_000})),
        )
        .unwrap();

        assert_eq!(pricing.listing_mode(), ListingMode::Rent);
        assert_eq!(
            serde_json::to_value(&pricing).unwrap(),
            json!({
                "listingMode": "Rent",
                "rentPerMonth": "23000",
                "securityDeposit": "50000",
            }),
        );
    }

    #[test]
    fn requires_positive_rent() {
        assert_eq!(
            Pricing::validate_and_compute(
                "Rent",
                &raw(json!({"rentPerMonth": 0})),
            ),
            Err(ValidationError::MissingRequiredField("rentPerMonth".into())),
        );
        assert_eq!(
            Pricing::validate_and_compute(
                "Rent",
                &raw(json!({"securityDeposit": 1000})),
            ),
            Err(ValidationError::MissingRequiredField("rentPerMonth".into())),
        );
    }

    #[test]
    fn requires_security_deposit() {
        assert_eq!(
            Pricing::validate_and_compute(
                "Rent",
                &raw(json!({"rentPerMonth": 23_000})),
            ),
            Err(ValidationError::MissingRequiredField(
                "securityDeposit".into(),
            )),
        );

        let zero_deposit = Pricing::validate_and_compute(
            "Rent",
            &raw(json!({"rentPerMonth": 23_000, "securityDeposit": "0"})),
        );
        assert!(zero_deposit.is_ok());
    }

    #[test]
    fn rejects_negative_values() {
        assert_eq!(
            Pricing::validate_and_compute(
                "Rent",
                &raw(json!({"rentPerMonth": 100, "securityDeposit": -5})),
            ),
            Err(ValidationError::OutOfRange {
                field: "securityDeposit".into(),
                value: dec!(-5),
            }),
        );
        assert_eq!(
            Pricing::validate_and_compute(
                "Rent",
                &raw(json!({"rentPerMonth": "-100", "securityDeposit": 5})),
            )
            .map_err(|e| e.kind()),
            Err(ErrorKind::OutOfRange),
        );
    }

    #[test]
    fn ignores_buy_fields() {
        let pricing = Pricing::validate_and_compute(
            "Rent",
            &raw(json!({
                "rentPerMonth": 23_000,
                "securityDeposit": 50_000,
                "askingPrice": "garbage",
                "finalPrice": 1,
            })),
        )
        .unwrap();

        assert_eq!(pricing.listed_price().amount(), dec!(23000));
    }
}

#[test]
fn rejects_unknown_listing_mode() {
    for mode in ["Lease", "buy", "", "Buy "] {
        let err = Pricing::validate_and_compute(mode, &RawPricing::new())
            .unwrap_err();
        assert_eq!(err, ValidationError::InvalidMode(mode.into()));
        assert_eq!(err.field(), None);
    }
}

#[test]
fn serializes_buy_with_derived_fields() {
    let pricing = Pricing::from(buy(json!({
        "askingPrice": 7_700_000,
        "stampDutyPercentage": 5,
        "advocateFee": 15_000,
        "receiptFee": 25_000,
        "brokerCommissionPercentage": 2,
        "priceHistory": [{"year": 2021, "cost": 2_000_000}],
    })));

    let document = serde_json::to_value(&pricing).unwrap();
    assert_eq!(document["listingMode"], "Buy");
    assert_eq!(document["stampDutyCost"], "385000");
    assert_eq!(document["brokerCommissionCost"], "154000");
    assert_eq!(document["finalPrice"], "8279000");
    assert_eq!(document["priceHistory"][0]["year"], 2021);
}

#[test]
fn recomputes_derived_fields_of_stored_document() {
    let stored = json!({
        "listingMode": "Buy",
        "askingPrice": 1_000_000,
        "stampDutyPercentage": 5,
        "stampDutyCost": 1,
        "finalPrice": 1,
    });

    let Pricing::Buy(pricing) = serde_json::from_value(stored).unwrap() else {
        panic!("expected `Buy` pricing");
    };
    assert_eq!(pricing.stamp_duty_cost().amount(), dec!(50000));
    assert_eq!(pricing.final_price().amount(), dec!(1050000));
}

#[test]
fn rejects_stored_document_without_positive_price() {
    for stored in [
        json!({
            "listingMode": "Rent",
            "rentPerMonth": 0,
            "securityDeposit": 1,
        }),
        json!({"listingMode": "Buy", "askingPrice": "0"}),
    ] {
        assert!(serde_json::from_value::<Pricing>(stored).is_err());
    }

    assert_eq!(Rent::new(Money::ZERO, Money::ZERO), None);
    let rent = Rent::new(Money::new(dec!(100)).unwrap(), Money::ZERO);
    assert_eq!(rent.map(|r| r.rent_per_month().amount()), Some(dec!(100)));
}

#[test]
fn recomputes_from_merged_fields() {
    let existing = Pricing::from(buy(json!({
        "askingPrice": 1_000_000,
        "stampDutyPercentage": 5,
        "advocateFee": 10_000,
        "priceHistory": [{"year": 2020, "cost": 900_000}],
    })));

    let mut merged = existing.to_raw();
    merged.merge(raw(json!({"askingPrice": "2000000", "advocateFee": null})));
    let Pricing::Buy(updated) =
        Pricing::validate_and_compute("Buy", &merged).unwrap()
    else {
        panic!("expected `Buy` pricing");
    };

    assert_eq!(updated.stamp_duty_cost().amount(), dec!(100000));
    assert_eq!(updated.advocate_fee().amount(), Decimal::ZERO);
    assert_eq!(updated.final_price().amount(), dec!(2100000));
    assert_eq!(updated.price_history().len(), 1);
}

#[test]
fn to_raw_recomputes_identically() {
    for pricing in [
        Pricing::from(buy(json!({
            "askingPrice": "1234567.89",
            "stampDutyPercentage": "5.5",
            "receiptFee": 100,
            "brokerCommissionPercentage": 1.25,
            "priceHistory": [{"year": 2019, "cost": "1000000.5"}],
        }))),
        Pricing::validate_and_compute(
            "Rent",
            &raw(json!({"rentPerMonth": 23_000, "securityDeposit": 0})),
        )
        .unwrap(),
    ] {
        let recomputed =
            Pricing::compute(pricing.listing_mode(), &pricing.to_raw())
                .unwrap();
        assert_eq!(recomputed, pricing);
    }
}

proptest! {
    #[test]
    fn final_price_adds_up(
        asking in 1_u64..=100_000_000_000,
        stamp_duty in 0_u32..=10_000,
        commission in 0_u32..=10_000,
        advocate in 0_u64..=10_000_000,
        receipt in 0_u64..=10_000_000,
    ) {
        let stamp_duty = Decimal::new(i64::from(stamp_duty), 2);
        let commission = Decimal::new(i64::from(commission), 2);
        let pricing = buy(json!({
            "askingPrice": asking,
            "stampDutyPercentage": stamp_duty.to_string(),
            "brokerCommissionPercentage": commission.to_string(),
            "advocateFee": advocate,
            "receiptFee": receipt,
        }));

        let asking = Decimal::from(asking);
        let stamp_duty_cost = asking * stamp_duty / Decimal::ONE_HUNDRED;
        let commission_cost = asking * commission / Decimal::ONE_HUNDRED;
        prop_assert_eq!(pricing.stamp_duty_cost().amount(), stamp_duty_cost);
        prop_assert_eq!(
            pricing.broker_commission_cost().amount(),
            commission_cost,
        );
        prop_assert_eq!(
            pricing.final_price().amount(),
            asking
                + stamp_duty_cost
                + commission_cost
                + Decimal::from(advocate)
                + Decimal::from(receipt),
        );
    }

    #[test]
    fn recomputation_is_deterministic(
        asking in 1_u64..=100_000_000_000,
        stamp_duty in 0_u32..=100,
        fee in 0_u64..=1_000_000,
        rent in proptest::bool::ANY,
    ) {
        let (mode, fields) = if rent {
            ("Rent", json!({"rentPerMonth": asking, "securityDeposit": fee}))
        } else {
            ("Buy", json!({
                "askingPrice": asking.to_string(),
                "stampDutyPercentage": stamp_duty,
                "receiptFee": fee,
            }))
        };
        let fields = raw(fields);

        let first = Pricing::validate_and_compute(mode, &fields).unwrap();
        let second = Pricing::validate_and_compute(mode, &fields).unwrap();
        prop_assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap(),
        );
    }
}
