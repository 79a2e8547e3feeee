use crate::MacAddress;

use mac2hostname_sql::{Row, SqlParam};

/// A MAC address bound to its permanent place in a group.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Assignment {
    /// Globally unique key.
    pub mac: MacAddress,

    /// The numbering namespace, stored as `hostname_base`.
    pub group: String,

    /// Position within `group`, starting at 1. Stored as `hostname_id`.
    pub sequence: u64,
}

impl Assignment {
    /// `group` immediately followed by the decimal `sequence`, e.g. `machine12`.
    #[must_use]
    pub fn hostname(&self) -> String {
        format!("{}{}", self.group, self.sequence)
    }

    /// Decodes a row carrying `hostname_base` and `hostname_id` columns.
    pub(crate) fn from_row(mac: MacAddress, row: &Row<'_>) -> Option<Self> {
        let group = row.get_text_by_name("hostname_base")?.to_string();
        let sequence = match row.get_by_name("hostname_id")? {
            SqlParam::Integer(id) => u64::try_from(*id).ok().filter(|&id| id > 0)?,
            _ => return None,
        };

        Some(Self {
            mac,
            group,
            sequence,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mac2hostname_sql::Rows;

    fn rows(values: Vec<SqlParam>) -> Rows {
        Rows {
            column_count: 2,
            column_names: vec!["hostname_base".to_string(), "hostname_id".to_string()],
            column_types: vec!["TEXT".to_string(), "INTEGER".to_string()],
            rows: vec![values],
        }
    }

    #[test]
    fn test_hostname_is_unpadded_concatenation() {
        let assignment = Assignment {
            mac: MacAddress::from("00:11:22:33:44:55"),
            group: "machine".to_string(),
            sequence: 12,
        };

        assert_eq!(assignment.hostname(), "machine12");
    }

    #[test]
    fn test_from_row() {
        let rows = rows(vec![SqlParam::Text("printer".to_string()), SqlParam::Integer(3)]);
        let assignment =
            Assignment::from_row(MacAddress::from("00:11:22:33:44:77"), &rows.row(0).unwrap())
                .unwrap();

        assert_eq!(assignment.group, "printer");
        assert_eq!(assignment.sequence, 3);
        assert_eq!(assignment.hostname(), "printer3");
    }

    #[test]
    fn test_from_row_reads_columns_by_name() {
        let rows = Rows {
            column_count: 2,
            column_names: vec!["hostname_id".to_string(), "hostname_base".to_string()],
            column_types: vec!["INTEGER".to_string(), "TEXT".to_string()],
            rows: vec![vec![SqlParam::Integer(9), SqlParam::Text("rack".to_string())]],
        };

        let assignment =
            Assignment::from_row(MacAddress::from("00:11:22:33:44:88"), &rows.row(0).unwrap())
                .unwrap();
        assert_eq!(assignment.hostname(), "rack9");

        let unnamed = Rows {
            column_names: vec!["a".to_string(), "b".to_string()],
            ..rows
        };
        assert!(
            Assignment::from_row(MacAddress::from("00:11:22:33:44:88"), &unnamed.row(0).unwrap())
                .is_none()
        );
    }

    #[test]
    fn test_from_row_rejects_bad_sequence() {
        for id in [SqlParam::Null, SqlParam::Integer(0), SqlParam::Integer(-4)] {
            let rows = rows(vec![SqlParam::Text("machine".to_string()), id]);
            assert!(
                Assignment::from_row(MacAddress::from("x"), &rows.row(0).unwrap()).is_none()
            );
        }
    }
}
