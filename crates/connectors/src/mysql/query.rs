use crate::sink::BulkLoadRequest;

/// Hard server-side cap on `?` placeholders in one prepared statement.
/// `max_batch_size × field_width` must stay under this ceiling.
pub const MYSQL_MAX_PLACEHOLDERS: usize = 65_535;

pub fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

fn escape_string_literal(value: &str) -> String {
    value.replace('\\', "\\\\").replace('\'', "\\'")
}

/// Renders one multi-row INSERT with positional placeholders, the
/// single write operation a batch turns into.
pub fn build_insert(table: &str, columns: &[String], row_count: usize) -> String {
    let cols = columns
        .iter()
        .map(|c| quote_identifier(c))
        .collect::<Vec<_>>()
        .join(", ");
    let row = format!("({})", vec!["?"; columns.len()].join(", "));
    let rows = vec![row; row_count].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES {}",
        quote_identifier(table),
        cols,
        rows
    )
}

/// Renders the destination-native whole-file ingestion statement.
///
/// Each source field is read into a user variable; the SET clause
/// assigns mapped columns from variables and constant columns from
/// literals. Path separators are normalized for the server.
pub fn build_load_data(request: &BulkLoadRequest) -> String {
    let path = escape_string_literal(&request.path.to_string_lossy().replace('\\', "/"));

    let vars = (0..request.mapping.min_source_fields())
        .map(|i| format!("@c{i}"))
        .collect::<Vec<_>>()
        .join(", ");

    let mut assignments: Vec<String> = request
        .mapping
        .bindings
        .iter()
        .map(|b| format!("{} = @c{}", quote_identifier(&b.column), b.source_index))
        .collect();
    assignments.extend(request.mapping.constants.iter().map(|c| {
        format!(
            "{} = '{}'",
            quote_identifier(&c.column),
            escape_string_literal(&c.value)
        )
    }));

    format!(
        "LOAD DATA LOCAL INFILE '{path}'\n\
         INTO TABLE {table}\n\
         FIELDS TERMINATED BY '{delimiter}'\n\
         ENCLOSED BY '\"'\n\
         LINES TERMINATED BY '\\n'\n\
         IGNORE 1 LINES\n\
         ({vars})\n\
         SET {assignments}",
        table = quote_identifier(&request.table),
        delimiter = request.delimiter,
        assignments = assignments.join(", "),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use model::mapping::{ColumnMapping, ConstantColumn, FieldBinding};
    use std::path::PathBuf;

    #[test]
    fn renders_multi_row_insert() {
        let columns = vec!["name".to_string(), "email".to_string()];
        let sql = build_insert("users", &columns, 3);
        assert_eq!(
            sql,
            "INSERT INTO `users` (`name`, `email`) VALUES (?, ?), (?, ?), (?, ?)"
        );
    }

    #[test]
    fn quotes_identifiers_with_embedded_backticks() {
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn renders_load_data_with_variables_and_set_clause() {
        let request = BulkLoadRequest {
            path: PathBuf::from("C:\\data\\users.csv"),
            table: "users".to_string(),
            delimiter: ',',
            mapping: ColumnMapping {
                bindings: vec![
                    FieldBinding {
                        source_index: 1,
                        column: "name".to_string(),
                    },
                    FieldBinding {
                        source_index: 2,
                        column: "email".to_string(),
                    },
                ],
                constants: vec![ConstantColumn {
                    column: "password".to_string(),
                    value: "default_hashed_password".to_string(),
                }],
            },
        };

        let sql = build_load_data(&request);
        assert_eq!(
            sql,
            "LOAD DATA LOCAL INFILE 'C:/data/users.csv'\n\
             INTO TABLE `users`\n\
             FIELDS TERMINATED BY ','\n\
             ENCLOSED BY '\"'\n\
             LINES TERMINATED BY '\\n'\n\
             IGNORE 1 LINES\n\
             (@c0, @c1, @c2)\n\
             SET `name` = @c1, `email` = @c2, `password` = 'default_hashed_password'"
        );
    }
}
