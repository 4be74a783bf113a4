use crate::error::{Result, StoreError};
use deercheck_core::domain::{phone_text, OrderDocument, OrderId, SearchPattern};
use rusqlite::{params, Connection, ErrorCode, OptionalExtension};
use serde_json::{Map, Value};

#[derive(Debug, Clone)]
pub struct OrderNew {
    /// Keeps an id already assigned upstream; a fresh one is generated otherwise.
    pub id: Option<OrderId>,
    pub fields: Map<String, Value>,
}

impl OrderNew {
    pub fn from_value(id: Option<OrderId>, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { id, fields }),
            _ => Err(StoreError::Core(deercheck_core::CoreError::InvalidDocument)),
        }
    }
}

pub struct OrdersRepo<'a> {
    conn: &'a Connection,
}

impl<'a> OrdersRepo<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    pub fn create(&self, now_utc: i64, input: OrderNew) -> Result<OrderDocument> {
        let id = input.id.unwrap_or_default();
        let phone = input.fields.get("phone").and_then(phone_text);
        let document = serde_json::to_string(&input.fields)?;

        let inserted = self.conn.execute(
            "INSERT INTO orders (id, phone, created_at, document) VALUES (?1, ?2, ?3, ?4);",
            params![id.as_str(), phone, now_utc, document],
        );
        if let Err(err) = inserted {
            if is_unique_violation(&err) {
                return Err(StoreError::DuplicateId(id.to_string()));
            }
            return Err(err.into());
        }

        Ok(OrderDocument {
            id,
            created_at: now_utc,
            fields: input.fields,
        })
    }

    pub fn get(&self, id: &OrderId) -> Result<Option<OrderDocument>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, created_at, document FROM orders WHERE id = ?1;",
                [id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i64>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;
        match row {
            Some((id, created_at, document)) => Ok(Some(order_from_parts(id, created_at, &document)?)),
            None => Ok(None),
        }
    }

    /// Orders whose stored phone text matches `pattern`, newest first.
    pub fn list_by_phone_pattern(&self, pattern: &SearchPattern) -> Result<Vec<OrderDocument>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, created_at, document
             FROM orders
             WHERE phone REGEXP ?1
             ORDER BY created_at DESC, id DESC;",
        )?;
        let mut rows = stmt.query([pattern.as_str()])?;
        let mut orders = Vec::new();
        while let Some(row) = rows.next()? {
            let id: String = row.get(0)?;
            let created_at: i64 = row.get(1)?;
            let document: String = row.get(2)?;
            orders.push(order_from_parts(id, created_at, &document)?);
        }
        Ok(orders)
    }

    pub fn latest_by_phone_pattern(&self, pattern: &SearchPattern) -> Result<Option<OrderDocument>> {
        Ok(self.list_by_phone_pattern(pattern)?.into_iter().next())
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM orders;", [], |row| row.get(0))?;
        Ok(count)
    }
}

fn order_from_parts(id: String, created_at: i64, document: &str) -> Result<OrderDocument> {
    let id = OrderId::parse(&id).map_err(|_| StoreError::InvalidId(id.clone()))?;
    let value: Value = serde_json::from_str(document)?;
    Ok(OrderDocument::from_value(id, created_at, value)?)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(inner, _) if inner.code == ErrorCode::ConstraintViolation
    )
}
