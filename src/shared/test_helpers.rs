#[cfg(test)]
pub use mock::*;

#[cfg(test)]
mod mock {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;
    use fake::faker::lorem::en::Sentence;
    use fake::Fake;
    use serde_json::{json, Value};

    use crate::features::categories::models::Category;
    use crate::features::prompts::models::Prompt;
    use crate::modules::gateway::{
        Filter, GatewayError, GatewayResult, SelectQuery, SortDirection, TableGateway,
    };
    use crate::shared::types::Tristate;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub enum Op {
        Select,
        Insert,
        Update,
        Delete,
    }

    #[derive(Debug, Clone)]
    pub struct Call {
        pub op: Op,
        pub table: String,
        pub payload: Option<Value>,
    }

    #[derive(Default)]
    struct MockState {
        tables: HashMap<String, Vec<Value>>,
        calls: Vec<Call>,
        failures: HashMap<(Op, String), String>,
    }

    /// In-memory gateway that records every call and can be told to fail
    #[derive(Clone, Default)]
    pub struct MockGateway {
        state: Arc<Mutex<MockState>>,
    }

    impl MockGateway {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn seed(&self, table: &str, rows: Vec<Value>) {
            let mut state = self.state.lock().unwrap();
            state.tables.entry(table.to_string()).or_default().extend(rows);
        }

        pub fn fail_on(&self, op: Op, table: &str, message: &str) {
            let mut state = self.state.lock().unwrap();
            state
                .failures
                .insert((op, table.to_string()), message.to_string());
        }

        pub fn clear_failures(&self) {
            self.state.lock().unwrap().failures.clear();
        }

        pub fn rows(&self, table: &str) -> Vec<Value> {
            let state = self.state.lock().unwrap();
            state.tables.get(table).cloned().unwrap_or_default()
        }

        pub fn calls(&self) -> Vec<Call> {
            self.state.lock().unwrap().calls.clone()
        }

        pub fn call_count(&self, op: Op, table: &str) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.op == op && c.table == table)
                .count()
        }

        pub fn total_calls(&self) -> usize {
            self.state.lock().unwrap().calls.len()
        }

        fn record(&self, op: Op, table: &str, payload: Option<Value>) -> GatewayResult<()> {
            let mut state = self.state.lock().unwrap();
            state.calls.push(Call {
                op,
                table: table.to_string(),
                payload,
            });
            match state.failures.get(&(op, table.to_string())) {
                Some(message) => Err(GatewayError::Remote {
                    status: 500,
                    message: message.clone(),
                }),
                None => Ok(()),
            }
        }
    }

    fn matches_all(row: &Value, filters: &[Filter]) -> bool {
        filters.iter().all(|f| f.matches(row))
    }

    #[async_trait]
    impl TableGateway for MockGateway {
        async fn select(&self, table: &str, query: &SelectQuery) -> GatewayResult<Vec<Value>> {
            self.record(Op::Select, table, None)?;

            let mut rows: Vec<Value> = self
                .rows(table)
                .into_iter()
                .filter(|row| matches_all(row, &query.filters))
                .collect();

            if let Some(ref order) = query.order {
                rows.sort_by(|a, b| {
                    let a = a.get(&order.column).map(|v| v.to_string()).unwrap_or_default();
                    let b = b.get(&order.column).map(|v| v.to_string()).unwrap_or_default();
                    match order.direction {
                        SortDirection::Asc => a.cmp(&b),
                        SortDirection::Desc => b.cmp(&a),
                    }
                });
            }

            if let Some(limit) = query.limit {
                rows.truncate(limit);
            }

            Ok(rows)
        }

        async fn insert(&self, table: &str, rows: Vec<Value>) -> GatewayResult<Vec<Value>> {
            self.record(Op::Insert, table, Some(Value::Array(rows.clone())))?;

            let stored: Vec<Value> = rows
                .into_iter()
                .map(|mut row| {
                    if let Some(obj) = row.as_object_mut() {
                        obj.entry("id")
                            .or_insert_with(|| json!(uuid::Uuid::new_v4().to_string()));
                        obj.entry("created_at")
                            .or_insert_with(|| json!(Utc::now()));
                    }
                    row
                })
                .collect();

            self.seed(table, stored.clone());
            Ok(stored)
        }

        async fn update(
            &self,
            table: &str,
            patch: Value,
            filters: &[Filter],
        ) -> GatewayResult<Vec<Value>> {
            self.record(Op::Update, table, Some(patch.clone()))?;

            let mut state = self.state.lock().unwrap();
            let rows = state.tables.entry(table.to_string()).or_default();
            let mut updated = Vec::new();
            for row in rows.iter_mut().filter(|r| matches_all(r, filters)) {
                if let (Some(obj), Some(changes)) = (row.as_object_mut(), patch.as_object()) {
                    for (k, v) in changes {
                        obj.insert(k.clone(), v.clone());
                    }
                }
                updated.push(row.clone());
            }
            Ok(updated)
        }

        async fn delete(&self, table: &str, filters: &[Filter]) -> GatewayResult<()> {
            self.record(Op::Delete, table, None)?;

            let mut state = self.state.lock().unwrap();
            if let Some(rows) = state.tables.get_mut(table) {
                rows.retain(|r| !matches_all(r, filters));
            }
            Ok(())
        }
    }

    pub fn category(id: &str, name: &str, parent_id: Option<&str>) -> Category {
        Category {
            id: id.to_string(),
            name: name.to_string(),
            parent_id: parent_id.map(str::to_string),
            created_at: Some(Utc::now()),
        }
    }

    pub fn prompt(id: &str, category_id: &str) -> Prompt {
        Prompt {
            id: id.to_string(),
            text: Sentence(3..8).fake(),
            category_id: category_id.to_string(),
            rating: 0,
            comments: Vec::new(),
            tags: Default::default(),
            created_at: Utc::now(),
            background_color: None,
            star_rating: None,
            copy_count: None,
            short_id: None,
            translated_text: Tristate::Unset,
        }
    }
}

#[cfg(test)]
pub use recording::RecordingNotifier;

#[cfg(test)]
mod recording {
    use std::sync::{Arc, Mutex};

    use crate::shared::notifications::{Notification, Notifier};

    /// Notifier that keeps every notification for assertions
    #[derive(Clone, Default)]
    pub struct RecordingNotifier {
        seen: Arc<Mutex<Vec<Notification>>>,
    }

    impl RecordingNotifier {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn all(&self) -> Vec<Notification> {
            self.seen.lock().unwrap().clone()
        }

        pub fn messages(&self) -> Vec<String> {
            self.all().into_iter().map(|n| n.message).collect()
        }
    }

    impl Notifier for RecordingNotifier {
        fn notify(&self, notification: Notification) {
            self.seen.lock().unwrap().push(notification);
        }
    }
}
