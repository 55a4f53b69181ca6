// ============================================================
// ENTITY CATALOG
// ============================================================
// The seven Contoso tables, their declared fields and the static
// mapping from source CSV headers to normalized column names.

use std::fmt;
use std::str::FromStr;

use super::error::AppError;

/// Declared storage type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Integer,
    Real,
    Text,
}

impl FieldType {
    pub fn sql_type(&self) -> &'static str {
        match self {
            FieldType::Integer => "INTEGER",
            FieldType::Real => "REAL",
            FieldType::Text => "TEXT",
        }
    }
}

/// One normalized column and the CSV header it is read from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDef {
    pub source: &'static str,
    pub name: &'static str,
    pub kind: FieldType,
    pub unique: bool,
}

const fn int(source: &'static str, name: &'static str) -> FieldDef {
    FieldDef {
        source,
        name,
        kind: FieldType::Integer,
        unique: false,
    }
}

const fn real(source: &'static str, name: &'static str) -> FieldDef {
    FieldDef {
        source,
        name,
        kind: FieldType::Real,
        unique: false,
    }
}

const fn text(source: &'static str, name: &'static str) -> FieldDef {
    FieldDef {
        source,
        name,
        kind: FieldType::Text,
        unique: false,
    }
}

const fn unique(field: FieldDef) -> FieldDef {
    FieldDef {
        unique: true,
        ..field
    }
}

const CUSTOMER_FIELDS: &[FieldDef] = &[
    unique(int("CustomerKey", "customer_key")),
    int("GeoAreaKey", "geo_area_key"),
    text("StartDT", "start_dt"),
    text("EndDT", "end_dt"),
    text("Continent", "continent"),
    text("Gender", "gender"),
    text("Title", "title"),
    text("GivenName", "given_name"),
    text("MiddleInitial", "middle_initial"),
    text("Surname", "surname"),
    text("StreetAddress", "street_address"),
    text("City", "city"),
    text("State", "state"),
    text("StateFull", "state_full"),
    text("ZipCode", "zip_code"),
    text("Country", "country"),
    text("CountryFull", "country_full"),
    text("Birthday", "birthday"),
    int("Age", "age"),
    text("Occupation", "occupation"),
    text("Company", "company"),
    text("Vehicle", "vehicle"),
    real("Latitude", "latitude"),
    real("Longitude", "longitude"),
];

const STORE_FIELDS: &[FieldDef] = &[
    unique(int("StoreKey", "store_key")),
    int("StoreCode", "store_code"),
    int("GeoAreaKey", "geo_area_key"),
    text("CountryCode", "country_code"),
    text("CountryName", "country_name"),
    text("State", "state"),
    text("OpenDate", "open_date"),
    text("CloseDate", "close_date"),
    text("Description", "description"),
    int("SquareMeters", "square_meters"),
    text("Status", "status"),
];

const PRODUCT_FIELDS: &[FieldDef] = &[
    unique(int("ProductKey", "product_key")),
    text("ProductCode", "product_code"),
    text("ProductName", "product_name"),
    text("Manufacturer", "manufacturer"),
    text("Brand", "brand"),
    text("Color", "color"),
    text("WeightUnit", "weight_unit"),
    real("Weight", "weight"),
    real("Cost", "cost"),
    real("Price", "price"),
    int("CategoryKey", "category_key"),
    text("CategoryName", "category_name"),
    int("SubCategoryKey", "sub_category_key"),
    text("SubCategoryName", "sub_category_name"),
];

const ORDER_FIELDS: &[FieldDef] = &[
    unique(int("OrderKey", "order_key")),
    int("CustomerKey", "customer_key"),
    int("StoreKey", "store_key"),
    text("OrderDate", "order_date"),
    text("DeliveryDate", "delivery_date"),
    text("CurrencyCode", "currency_code"),
];

const ORDER_ROW_FIELDS: &[FieldDef] = &[
    int("OrderKey", "order_key"),
    int("LineNumber", "line_number"),
    int("ProductKey", "product_key"),
    int("Quantity", "quantity"),
    real("UnitPrice", "unit_price"),
    real("NetPrice", "net_price"),
    real("UnitCost", "unit_cost"),
];

const DATE_FIELDS: &[FieldDef] = &[
    unique(text("Date", "date")),
    int("DateKey", "date_key"),
    int("Year", "year"),
    text("YearQuarter", "year_quarter"),
    int("YearQuarterNumber", "year_quarter_number"),
    text("Quarter", "quarter"),
    text("YearMonth", "year_month"),
    text("YearMonthShort", "year_month_short"),
    int("YearMonthNumber", "year_month_number"),
    text("Month", "month"),
    text("MonthShort", "month_short"),
    int("MonthNumber", "month_number"),
    text("DayofWeek", "day_of_week"),
    text("DayofWeekShort", "day_of_week_short"),
    int("DayofWeekNumber", "day_of_week_number"),
    int("WorkingDay", "working_day"),
    int("WorkingDayNumber", "working_day_number"),
];

const CURRENCY_FIELDS: &[FieldDef] = &[
    text("Date", "date"),
    text("FromCurrency", "from_currency"),
    text("ToCurrency", "to_currency"),
    real("Exchange", "exchange"),
];

/// The seven browsable tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Customers,
    Stores,
    Products,
    Orders,
    OrderRows,
    Dates,
    Currency,
}

impl Entity {
    /// Load and display order
    pub const ALL: [Entity; 7] = [
        Entity::Customers,
        Entity::Stores,
        Entity::Products,
        Entity::Orders,
        Entity::OrderRows,
        Entity::Dates,
        Entity::Currency,
    ];

    /// Route segment and dashboard label
    pub fn slug(&self) -> &'static str {
        match self {
            Entity::Customers => "customers",
            Entity::Stores => "stores",
            Entity::Products => "products",
            Entity::Orders => "orders",
            Entity::OrderRows => "order_rows",
            Entity::Dates => "dates",
            Entity::Currency => "currency",
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            Entity::Currency => "currency_exchanges",
            other => other.slug(),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Entity::Customers => "Customers",
            Entity::Stores => "Stores",
            Entity::Products => "Products",
            Entity::Orders => "Orders",
            Entity::OrderRows => "Order Rows",
            Entity::Dates => "Dates",
            Entity::Currency => "Currency Exchange",
        }
    }

    pub fn csv_file(&self) -> &'static str {
        match self {
            Entity::Customers => "customer.csv",
            Entity::Stores => "store.csv",
            Entity::Products => "product.csv",
            Entity::Orders => "orders.csv",
            Entity::OrderRows => "orderrows.csv",
            Entity::Dates => "date.csv",
            Entity::Currency => "currencyexchange.csv",
        }
    }

    pub fn fields(&self) -> &'static [FieldDef] {
        match self {
            Entity::Customers => CUSTOMER_FIELDS,
            Entity::Stores => STORE_FIELDS,
            Entity::Products => PRODUCT_FIELDS,
            Entity::Orders => ORDER_FIELDS,
            Entity::OrderRows => ORDER_ROW_FIELDS,
            Entity::Dates => DATE_FIELDS,
            Entity::Currency => CURRENCY_FIELDS,
        }
    }

    /// Target field for a source CSV header, if the header is mapped
    pub fn field_for_header(&self, header: &str) -> Option<usize> {
        self.fields().iter().position(|f| f.source == header)
    }

    /// CREATE TABLE statement with a surrogate `id` key
    pub fn create_table_sql(&self) -> String {
        let columns = self
            .fields()
            .iter()
            .map(|f| {
                if f.unique {
                    format!("{} {} UNIQUE", f.name, f.kind.sql_type())
                } else {
                    format!("{} {}", f.name, f.kind.sql_type())
                }
            })
            .collect::<Vec<_>>()
            .join(",\n                ");

        format!(
            "CREATE TABLE {} (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                {}
            )",
            self.table(),
            columns
        )
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for Entity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Entity::ALL
            .iter()
            .copied()
            .find(|e| e.slug() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown table: {}", s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_slug_round_trip() {
        for entity in Entity::ALL {
            assert_eq!(entity.slug().parse::<Entity>().unwrap(), entity);
        }
        assert!("currency_exchanges".parse::<Entity>().is_err());
    }

    #[test]
    fn test_currency_uses_own_table_name() {
        assert_eq!(Entity::Currency.slug(), "currency");
        assert_eq!(Entity::Currency.table(), "currency_exchanges");
        assert_eq!(Entity::OrderRows.table(), "order_rows");
    }

    #[test]
    fn test_field_names_are_unique_per_entity() {
        for entity in Entity::ALL {
            let names: HashSet<_> = entity.fields().iter().map(|f| f.name).collect();
            assert_eq!(names.len(), entity.fields().len(), "{}", entity);
            let sources: HashSet<_> = entity.fields().iter().map(|f| f.source).collect();
            assert_eq!(sources.len(), entity.fields().len(), "{}", entity);
        }
    }

    #[test]
    fn test_declared_natural_keys() {
        let keys = |e: Entity| -> Vec<&str> {
            e.fields().iter().filter(|f| f.unique).map(|f| f.name).collect()
        };
        assert_eq!(keys(Entity::Customers), vec!["customer_key"]);
        assert_eq!(keys(Entity::Stores), vec!["store_key"]);
        assert_eq!(keys(Entity::Products), vec!["product_key"]);
        assert_eq!(keys(Entity::Orders), vec!["order_key"]);
        assert_eq!(keys(Entity::Dates), vec!["date"]);
        assert!(keys(Entity::OrderRows).is_empty());
        assert!(keys(Entity::Currency).is_empty());
    }

    #[test]
    fn test_header_mapping() {
        let idx = Entity::Dates.field_for_header("DayofWeekShort").unwrap();
        assert_eq!(Entity::Dates.fields()[idx].name, "day_of_week_short");
        assert!(Entity::Dates.field_for_header("DayOfWeekShort").is_none());
        assert!(Entity::Customers.field_for_header("Unmapped").is_none());
    }

    #[test]
    fn test_create_table_sql() {
        let sql = Entity::Currency.create_table_sql();
        assert!(sql.starts_with("CREATE TABLE currency_exchanges ("));
        assert!(sql.contains("id INTEGER PRIMARY KEY AUTOINCREMENT"));
        assert!(sql.contains("exchange REAL"));
        assert!(!sql.contains("UNIQUE"));

        let sql = Entity::Customers.create_table_sql();
        assert!(sql.contains("customer_key INTEGER UNIQUE"));
        assert!(sql.contains("latitude REAL"));
    }
}
