//! Data providers: the bridge between API models and the output engine

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use super::error::OutputError;
use super::fields::OrderedFields;
use super::flatten::Flattener;
use super::handler::Format;

/// Output metadata of a record type.
///
/// Column names are the serialized field names; nested structs use
/// `<parent>_<child>`.
pub trait Renderable: Serialize {
    /// Columns shown when no `--property` is given. Empty means "use the
    /// per-field default flags".
    fn default_columns() -> &'static [&'static str] {
        &[]
    }

    /// Columns never emitted as rows
    fn ignored_columns() -> &'static [&'static str] {
        &[]
    }

    /// Float columns rendered with 2 decimals
    fn monetary_columns() -> &'static [&'static str] {
        &[]
    }
}

impl<T: Renderable> Renderable for Vec<T> {
    fn default_columns() -> &'static [&'static str] {
        T::default_columns()
    }

    fn ignored_columns() -> &'static [&'static str] {
        T::ignored_columns()
    }

    fn monetary_columns() -> &'static [&'static str] {
        T::monetary_columns()
    }
}

impl<T: Renderable> Renderable for [T] {
    fn default_columns() -> &'static [&'static str] {
        T::default_columns()
    }

    fn ignored_columns() -> &'static [&'static str] {
        T::ignored_columns()
    }

    fn monetary_columns() -> &'static [&'static str] {
        T::monetary_columns()
    }
}

impl Renderable for String {}

impl Renderable for Value {}

type FieldsFn = Box<dyn Fn(&Value) -> Result<Vec<OrderedFields>, OutputError>>;

enum RowSource {
    Flatten(Flattener),
    Fields(FieldsFn),
}

pub struct Provider {
    raw: Value,
    rows: RowSource,
    default_columns: Vec<String>,
    supported_formats: Option<Vec<Format>>,
}

impl Provider {
    /// Rows are produced by flattening the serialized record(s)
    pub fn from_data<T: Renderable + ?Sized>(data: &T) -> Result<Self, OutputError> {
        let raw = serde_json::to_value(data)?;
        let flattener = Flattener::new()
            .with_default_fields(T::default_columns().iter().copied())
            .with_ignored_fields(T::ignored_columns().iter().copied())
            .with_monetary_fields(T::monetary_columns().iter().copied());

        Ok(Self {
            raw,
            rows: RowSource::Flatten(flattener),
            default_columns: T::default_columns().iter().map(|c| c.to_string()).collect(),
            supported_formats: None,
        })
    }

    /// Rows are produced by a caller-supplied function of the serialized
    /// data; default flags are whatever that function sets.
    pub fn from_fields<T, F>(data: &T, fields: F) -> Result<Self, OutputError>
    where
        T: Serialize + ?Sized,
        F: Fn(&Value) -> Result<Vec<OrderedFields>, OutputError> + 'static,
    {
        Ok(Self {
            raw: serde_json::to_value(data)?,
            rows: RowSource::Fields(Box::new(fields)),
            default_columns: Vec::new(),
            supported_formats: None,
        })
    }

    /// Register a per-column conversion on the flattener.
    ///
    /// Providers built with [`from_fields`](Self::from_fields) produce their
    /// rows themselves and ignore handlers.
    pub fn with_handler<F>(mut self, name: &str, handler: F) -> Self
    where
        F: Fn(&mut OrderedFields, &str, &Value) + 'static,
    {
        self.rows = match self.rows {
            RowSource::Flatten(flattener) => {
                RowSource::Flatten(flattener.with_handler(name, handler))
            }
            RowSource::Fields(fields) => {
                debug!(column = name, "handler ignored by a fields provider");
                RowSource::Fields(fields)
            }
        };
        self
    }

    pub fn with_supported_formats(mut self, formats: &[Format]) -> Self {
        self.supported_formats = Some(formats.to_vec());
        self
    }

    pub fn raw(&self) -> &Value {
        &self.raw
    }

    pub fn default_columns(&self) -> &[String] {
        &self.default_columns
    }

    /// `None` means every format is accepted
    pub fn supported_formats(&self) -> Option<&[Format]> {
        self.supported_formats.as_deref()
    }

    pub fn field_data(&self) -> Result<Vec<OrderedFields>, OutputError> {
        match &self.rows {
            RowSource::Flatten(flattener) => Ok(flattener.flatten(&self.raw)),
            RowSource::Fields(fields) => fields(&self.raw),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Serialize)]
    struct Bucket {
        id: u32,
        name: String,
        price: f64,
        secret: String,
    }

    impl Renderable for Bucket {
        fn default_columns() -> &'static [&'static str] {
            &["name", "id"]
        }

        fn ignored_columns() -> &'static [&'static str] {
            &["secret"]
        }

        fn monetary_columns() -> &'static [&'static str] {
            &["price"]
        }
    }

    fn bucket(id: u32) -> Bucket {
        Bucket {
            id,
            name: format!("b{}", id),
            price: 1.5,
            secret: "hidden".into(),
        }
    }

    #[test]
    fn data_provider_applies_type_policy() {
        let provider = Provider::from_data(&bucket(1)).unwrap();
        let rows = provider.field_data().unwrap();

        assert_eq!(rows[0].keys(), &["id", "name", "price"]);
        assert_eq!(rows[0].value("price"), Some("1.50"));
        assert_eq!(rows[0].default_keys(), vec!["id", "name"]);
        assert_eq!(provider.default_columns(), &["name", "id"]);
    }

    #[test]
    fn sequences_share_the_element_policy() {
        let buckets = vec![bucket(1), bucket(2)];
        let provider = Provider::from_data(&buckets).unwrap();

        assert_eq!(provider.field_data().unwrap().len(), 2);
        assert_eq!(provider.default_columns(), &["name", "id"]);
        assert!(provider.raw().is_array());
    }

    #[test]
    fn handlers_reach_the_flattener() {
        let provider = Provider::from_data(&bucket(1))
            .unwrap()
            .with_handler("name", |row, name, value| {
                let upper = value.as_str().unwrap_or_default().to_uppercase();
                row.set(name, upper, true);
            });

        assert_eq!(provider.field_data().unwrap()[0].value("name"), Some("B1"));
    }

    #[test]
    fn fields_provider_ignores_handlers() {
        let provider = Provider::from_fields(&bucket(1), |raw| {
            let mut row = OrderedFields::new();
            row.set("name", raw["name"].as_str().unwrap_or_default(), true);
            Ok(vec![row])
        })
        .unwrap()
        .with_handler("name", |row, name, _| row.set(name, "changed", true));

        assert_eq!(provider.field_data().unwrap()[0].value("name"), Some("b1"));
    }

    #[test]
    fn fields_provider_propagates_errors() {
        let provider = Provider::from_fields(&bucket(1), |_| {
            Err(OutputError::MissingOption {
                format: "table",
                flag: "property",
            })
        })
        .unwrap();

        assert!(provider.field_data().is_err());
        assert_eq!(provider.raw()["id"], 1);
    }
}
