use bytes::Bytes;
use libsql::{Rows as LibsqlRows, Value, ValueType};
use mac2hostname_sql::{Rows, SqlParam};

use crate::Error;

pub fn to_libsql_params(params: Vec<SqlParam>) -> Vec<Value> {
    params.into_iter().map(param_to_value).collect()
}

fn param_to_value(param: SqlParam) -> Value {
    match param {
        SqlParam::Blob(bytes) => Value::Blob(bytes.to_vec()),
        SqlParam::Integer(int) => Value::Integer(int),
        SqlParam::Null => Value::Null,
        SqlParam::Real(real) => Value::Real(real),
        SqlParam::Text(text) => Value::Text(text),
    }
}

fn value_to_param(value: Value) -> SqlParam {
    match value {
        Value::Blob(bytes) => SqlParam::Blob(Bytes::from(bytes)),
        Value::Integer(int) => SqlParam::Integer(int),
        Value::Null => SqlParam::Null,
        Value::Real(real) => SqlParam::Real(real),
        Value::Text(text) => SqlParam::Text(text),
    }
}

// Declared types only; expressions such as `MAX(x)` have none and report NULL.
fn type_name(value_type: Result<ValueType, libsql::Error>) -> &'static str {
    match value_type {
        Ok(ValueType::Blob) => "BLOB",
        Ok(ValueType::Integer) => "INTEGER",
        Ok(ValueType::Real) => "REAL",
        Ok(ValueType::Text) => "TEXT",
        Ok(ValueType::Null) | Err(_) => "NULL",
    }
}

/// Drains a libsql cursor into owned [`Rows`].
pub async fn convert_libsql_rows(mut cursor: LibsqlRows) -> Result<Rows, Error> {
    let count = cursor.column_count();
    let column_count = u16::try_from(count).map_err(|_| Error::InvalidColumnCount)?;

    let column_names = (0..count)
        .map(|i| cursor.column_name(i).unwrap_or_default().to_string())
        .collect();
    let column_types = (0..count)
        .map(|i| type_name(cursor.column_type(i)).to_string())
        .collect();

    let mut rows = Vec::new();
    while let Some(row) = cursor.next().await? {
        let values = (0..count)
            .map(|i| row.get_value(i).map(value_to_param))
            .collect::<Result<Vec<_>, _>>()?;
        rows.push(values);
    }

    Ok(Rows {
        column_count,
        column_names,
        column_types,
        rows,
    })
}
