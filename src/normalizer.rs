//! # Field Normalizer
//! Different report schemas name their headline value differently. We map them all onto one
//! canonical price by trying the known names in a fixed order.

use crate::decoder::{DecodedReport, FieldValue};

/// Candidate price fields, highest priority first. Dotted entries descend into nested records.
pub const PRICE_FIELDS: [&str; 8] = [
    "price",
    "benchmarkPrice",
    "nativeBenchmarkPrice",
    "midPrice",
    "exchangeRate",
    "navPerShare",
    "tokenizedPrice",
    "payload.benchmarkPrice",
];

/// Returns the first candidate present on the report, or `None` if the report carries no price.
pub fn pick_price(decoded: &DecodedReport) -> Option<&FieldValue> {
    PRICE_FIELDS.iter().find_map(|path| decoded.get(path))
}

#[cfg(test)]
mod tests {
    use ethers::types::{I256, U256};

    use super::*;
    use crate::decoder::Field;
    use crate::schema::SchemaVersion;

    fn int(value: i128) -> FieldValue {
        FieldValue::Int(I256::from(value))
    }

    fn report(fields: Vec<Field>) -> DecodedReport {
        DecodedReport {
            version: SchemaVersion::V3,
            fields,
        }
    }

    #[test]
    fn price_wins_over_benchmark_price() {
        // benchmarkPrice comes first in the payload, order of the fallback list decides.
        let decoded = report(vec![
            Field {
                name: "benchmarkPrice",
                value: int(1),
            },
            Field {
                name: "price",
                value: int(2),
            },
        ]);

        assert_eq!(pick_price(&decoded), Some(&int(2)));
    }

    #[test]
    fn falls_back_to_nested_benchmark_price() {
        let decoded = report(vec![
            Field {
                name: "marketStatus",
                value: FieldValue::Uint(U256::from(2)),
            },
            Field {
                name: "payload",
                value: FieldValue::Record(vec![Field {
                    name: "benchmarkPrice",
                    value: int(7),
                }]),
            },
        ]);

        assert_eq!(pick_price(&decoded), Some(&int(7)));
    }

    #[test]
    fn walks_the_chain_in_order() {
        let decoded = report(vec![
            Field {
                name: "tokenizedPrice",
                value: int(3),
            },
            Field {
                name: "navPerShare",
                value: int(4),
            },
        ]);

        assert_eq!(pick_price(&decoded), Some(&int(4)));
    }

    #[test]
    fn no_price_field_yields_none() {
        let decoded = report(vec![Field {
            name: "rate",
            value: int(5),
        }]);

        assert_eq!(pick_price(&decoded), None);
    }
}
