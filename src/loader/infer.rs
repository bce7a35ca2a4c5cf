use csv::StringRecord;

use crate::{
    catalog::{ColumnDef, DataType, Schema},
    tuple::parse_bool,
};

use super::NullValues;

/// Candidate types still open for one column. A column starts as every
/// candidate and narrows as values rule them out.
#[derive(Debug, Clone, Copy)]
struct ColumnState {
    int: bool,
    float: bool,
    boolean: bool,
    seen_value: bool,
    seen_null: bool,
}

impl ColumnState {
    fn new() -> Self {
        ColumnState {
            int: true,
            float: true,
            boolean: true,
            seen_value: false,
            seen_null: false,
        }
    }

    fn observe(&mut self, raw: &str, nulls: &NullValues) {
        if nulls.is_null(raw) {
            self.seen_null = true;
            return;
        }
        self.seen_value = true;
        let value = raw.trim();
        if self.int && value.parse::<i64>().is_err() {
            self.int = false;
        }
        if self.float && value.parse::<f64>().is_err() {
            self.float = false;
        }
        if self.boolean && parse_bool(value).is_none() {
            self.boolean = false;
        }
    }

    fn data_type(&self) -> DataType {
        if !self.seen_value {
            DataType::Text
        } else if self.int {
            DataType::Int
        } else if self.float {
            DataType::Float
        } else if self.boolean {
            DataType::Boolean
        } else {
            DataType::Text
        }
    }
}

/// Infers one column definition per header field. Columns keep header order.
pub fn infer_schema(header: &StringRecord, records: &[StringRecord], nulls: &NullValues) -> Schema {
    let mut states = vec![ColumnState::new(); header.len()];
    for record in records {
        for (state, raw) in states.iter_mut().zip(record.iter()) {
            state.observe(raw, nulls);
        }
    }
    let columns = header
        .iter()
        .zip(states.iter())
        .map(|(name, state)| {
            // Columns without any value are nullable so an empty table accepts later rows.
            let nullable = state.seen_null || !state.seen_value;
            ColumnDef::new(name, state.data_type(), nullable)
        })
        .collect();
    Schema::new(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn infer_single(values: &[&str]) -> ColumnDef {
        let header = StringRecord::from(vec!["c"]);
        let records: Vec<StringRecord> = values.iter().map(|v| StringRecord::from(vec![*v])).collect();
        infer_schema(&header, &records, &NullValues::default())
            .get_column(0)
            .clone()
    }

    #[rstest]
    #[case::int(&["1", "2", "-3"], DataType::Int, false)]
    #[case::int_with_nulls(&["1", "", "NA"], DataType::Int, true)]
    #[case::float(&["1", "2.5", "1e3"], DataType::Float, false)]
    #[case::int_overflow(&["99999999999999999999"], DataType::Float, false)]
    #[case::boolean(&["True", "false", "TRUE"], DataType::Boolean, false)]
    #[case::mixed(&["1", "Monet"], DataType::Text, false)]
    #[case::all_null(&["", "NULL"], DataType::Text, true)]
    #[case::padded_int(&[" 12 ", "7"], DataType::Int, false)]
    #[case::nan_spellings(&["1.5", "-NaN", "NAN", "nan"], DataType::Float, true)]
    #[case::int_with_nan(&["3", "NaN"], DataType::Int, true)]
    #[case::pandas_tokens(&["<NA>", "#NA", "1.#QNAN", "-1.#IND"], DataType::Text, true)]
    fn test_infer_column(
        #[case] values: &[&str],
        #[case] expected: DataType,
        #[case] nullable: bool,
    ) {
        let col = infer_single(values);
        assert_eq!(col.data_type(), &expected);
        assert_eq!(col.is_nullable(), nullable);
    }

    #[test]
    fn test_infer_keeps_header_order() {
        let header = StringRecord::from(vec!["id", "name", "nationality"]);
        let records = vec![
            StringRecord::from(vec!["1", "Claude Monet", "French"]),
            StringRecord::from(vec!["2", "Vincent van Gogh", ""]),
        ];
        let schema = infer_schema(&header, &records, &NullValues::default());
        assert_eq!(schema.column_names(), vec!["id", "name", "nationality"]);
        assert_eq!(schema.get_column(0).data_type(), &DataType::Int);
        assert!(!schema.get_column(0).is_nullable());
        assert!(schema.get_column(2).is_nullable());
    }

    #[test]
    fn test_infer_empty_table() {
        let header = StringRecord::from(vec!["id", "name"]);
        let schema = infer_schema(&header, &[], &NullValues::default());
        assert!(schema
            .columns()
            .iter()
            .all(|c| c.data_type() == &DataType::Text && c.is_nullable()));
    }
}
