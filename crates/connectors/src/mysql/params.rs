use model::{core::value::Value, records::row::RowData};
use mysql_async::Value as MySqlValue;

pub fn to_mysql_value(value: &Value) -> MySqlValue {
    match value {
        Value::Int(i) => MySqlValue::Int(*i),
        Value::Uint(u) => MySqlValue::UInt(*u),
        Value::Float(f) => MySqlValue::Double(*f),
        Value::String(s) => MySqlValue::Bytes(s.clone().into_bytes()),
        Value::Boolean(b) => MySqlValue::Int(if *b { 1 } else { 0 }),
        Value::Null => MySqlValue::NULL,
    }
}

/// Flattens a batch into the positional parameter list of one
/// multi-row INSERT, row by row in source order.
pub fn batch_params(rows: &[RowData]) -> Vec<MySqlValue> {
    rows.iter()
        .flat_map(|row| row.values.iter().map(to_mysql_value))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_scalars() {
        assert_eq!(to_mysql_value(&Value::Int(-5)), MySqlValue::Int(-5));
        assert_eq!(to_mysql_value(&Value::Uint(5)), MySqlValue::UInt(5));
        assert_eq!(to_mysql_value(&Value::Float(1.5)), MySqlValue::Double(1.5));
        assert_eq!(
            to_mysql_value(&Value::String("abc".into())),
            MySqlValue::Bytes(b"abc".to_vec())
        );
        assert_eq!(to_mysql_value(&Value::Boolean(true)), MySqlValue::Int(1));
        assert_eq!(to_mysql_value(&Value::Null), MySqlValue::NULL);
    }

    #[test]
    fn flattens_rows_in_order() {
        let rows = vec![
            RowData::new(0, vec![Value::String("a".into()), Value::Null]),
            RowData::new(1, vec![Value::String("b".into()), Value::Int(2)]),
        ];

        let params = batch_params(&rows);
        assert_eq!(
            params,
            vec![
                MySqlValue::Bytes(b"a".to_vec()),
                MySqlValue::NULL,
                MySqlValue::Bytes(b"b".to_vec()),
                MySqlValue::Int(2),
            ]
        );
    }
}
