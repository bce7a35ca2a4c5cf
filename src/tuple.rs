use crate::catalog::{ColumnDef, DataType};

#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    fields: Vec<Field>,
}

impl Tuple {
    pub fn to_pretty_string(&self) -> String {
        // Each field has a fixed width of 20 characters.
        let width = 20;
        let mut res = String::new();
        for field in &self.fields {
            let field_str = format!("{}", field);
            let chars = field_str.chars().count();
            if chars > width {
                res.extend(field_str.chars().take(width - 3));
                res.push_str("...");
            } else {
                res.push_str(&field_str);
                for _ in 0..width - chars {
                    res.push(' ');
                }
            }
            res.push_str(" | ");
        }
        res
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Tuple {
            fields: Vec::with_capacity(capacity),
        }
    }

    pub fn from_fields(fields: Vec<Field>) -> Self {
        Tuple { fields }
    }

    pub fn fields(&self) -> &Vec<Field> {
        &self.fields
    }

    pub fn get(&self, field_idx: usize) -> &Field {
        &self.fields[field_idx]
    }

    pub fn push(&mut self, field: Field) {
        self.fields.push(field);
    }
}

impl std::fmt::Display for Tuple {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(|field| field.to_string()).collect();
        write!(f, "{}", fields.join("|"))
    }
}

/// A single cell. `None` is SQL NULL.
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Boolean(Option<bool>),
    Int(Option<i64>),
    Float(Option<f64>),
    Text(Option<String>),
}

/// Parses the boolean spellings a csv export typically carries.
pub fn parse_bool(raw: &str) -> Option<bool> {
    match raw {
        "true" | "True" | "TRUE" => Some(true),
        "false" | "False" | "FALSE" => Some(false),
        _ => None,
    }
}

impl Field {
    pub fn null(data_type: &DataType) -> Self {
        match data_type {
            DataType::Boolean => Field::Boolean(None),
            DataType::Int => Field::Int(None),
            DataType::Float => Field::Float(None),
            DataType::Text => Field::Text(None),
        }
    }

    /// Parse a raw csv cell according to `column_def`. `is_null` tells whether the
    /// raw text is one of the configured null tokens.
    pub fn from_str(column_def: &ColumnDef, field: &str, is_null: bool) -> Result<Self, String> {
        let data_type = column_def.data_type();
        if is_null {
            if column_def.is_nullable() {
                return Ok(Field::null(data_type));
            }
            return Err(format!("null in non-nullable column {}", column_def.name()));
        }
        match data_type {
            DataType::Boolean => {
                let val = parse_bool(field.trim())
                    .ok_or_else(|| format!("{:?} is not a boolean", field))?;
                Ok(Field::Boolean(Some(val)))
            }
            DataType::Int => {
                let val = field.trim().parse::<i64>().map_err(|e| e.to_string())?;
                Ok(Field::Int(Some(val)))
            }
            DataType::Float => {
                let val = field.trim().parse::<f64>().map_err(|e| e.to_string())?;
                if val.is_nan() {
                    return Field::from_str(column_def, field, true);
                }
                Ok(Field::Float(Some(val)))
            }
            DataType::Text => Ok(Field::Text(Some(field.to_string()))),
        }
    }
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Field::Boolean(Some(val)) => write!(f, "{}", val),
            Field::Int(Some(val)) => write!(f, "{}", val),
            Field::Float(Some(val)) => write!(f, "{}", val),
            Field::Text(Some(val)) => write!(f, "{}", val),
            _ => write!(f, "NULL"),
        }
    }
}
