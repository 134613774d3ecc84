/*!
Labeled graphs: optional string-keyed attribute maps attached to nodes and edges.
*/

use std::{collections::BTreeMap, fmt::Display};

use super::*;

/// Value of a node or edge attribute
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl Display for AttrValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttrValue::Bool(b) => write!(f, "{b}"),
            AttrValue::Int(i) => write!(f, "{i}"),
            AttrValue::Float(x) => write!(f, "{x}"),
            AttrValue::Text(s) => write!(f, "{s}"),
        }
    }
}

impl From<bool> for AttrValue {
    fn from(value: bool) -> Self {
        AttrValue::Bool(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_owned())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

/// Attributes of a single node or edge, ordered by name
pub type AttrMap = BTreeMap<String, AttrValue>;

impl<K: NodeKey> Graph<K> {
    /// Sets attribute `name` of node `key`, returning the previous value
    pub fn set_node_attr<V>(&mut self, key: &K, name: &str, value: V) -> Result<Option<AttrValue>>
    where
        V: Into<AttrValue>,
    {
        let u = self.index_of(key)?;
        Ok(self
            .node_attrs
            .entry(u)
            .or_default()
            .insert(name.to_owned(), value.into()))
    }

    /// Returns attribute `name` of node `key`
    pub fn node_attr(&self, key: &K, name: &str) -> Result<Option<&AttrValue>> {
        let u = self.index_of(key)?;
        Ok(self.node_attrs.get(&u).and_then(|attrs| attrs.get(name)))
    }

    /// Returns all attributes of node `key` (`None` if it never had any)
    pub fn node_attrs(&self, key: &K) -> Result<Option<&AttrMap>> {
        let u = self.index_of(key)?;
        Ok(self.node_attrs.get(&u))
    }

    /// Sets attribute `name` of edge `id`, returning the previous value
    pub fn set_edge_attr<V>(&mut self, id: EdgeId, name: &str, value: V) -> Result<Option<AttrValue>>
    where
        V: Into<AttrValue>,
    {
        if self.record(id).is_none() {
            return Err(GraphError::EdgeNotFound(format!("#{id}")));
        }
        Ok(self
            .edge_attrs
            .entry(id)
            .or_default()
            .insert(name.to_owned(), value.into()))
    }

    /// Returns attribute `name` of edge `id`
    pub fn edge_attr(&self, id: EdgeId, name: &str) -> Result<Option<&AttrValue>> {
        if self.record(id).is_none() {
            return Err(GraphError::EdgeNotFound(format!("#{id}")));
        }
        Ok(self.edge_attrs.get(&id).and_then(|attrs| attrs.get(name)))
    }

    /// Returns the keys of all nodes whose attribute `name` equals `value`, in insertion order
    pub fn nodes_with_attr(&self, name: &str, value: &AttrValue) -> Vec<K> {
        self.nodes
            .iter()
            .filter(|(u, _)| {
                self.node_attrs
                    .get(u)
                    .and_then(|attrs| attrs.get(name))
                    .is_some_and(|v| v == value)
            })
            .map(|(_, k)| k.clone())
            .collect()
    }

    /// Returns the subgraph induced by `keys` with the same configuration.
    /// Weights and attributes of nodes and edges are carried over; edge ids are not.
    pub fn subgraph<'a, I>(&self, keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut sub = Self::new(self.config);
        let mut mapping = FxHashMap::default();

        for key in keys {
            let u = self.index_of(key)?;
            let su = sub.add_node(key.clone());
            mapping.insert(u, su);
            if let Some(attrs) = self.node_attrs.get(&u) {
                sub.node_attrs.insert(su, attrs.clone());
            }
        }

        for (id, record) in self.edges.iter().enumerate() {
            let Some(record) = record else { continue };
            if !mapping.contains_key(&record.source) || !mapping.contains_key(&record.target) {
                continue;
            }

            let weight = self.config.is_weighted().then_some(record.weight);
            let new_id = sub.add_edge(
                self.key_of(record.source).clone(),
                self.key_of(record.target).clone(),
                weight,
            )?;
            if let Some(attrs) = self.edge_attrs.get(&(id as EdgeId)) {
                sub.edge_attrs.insert(new_id, attrs.clone());
            }
        }

        Ok(sub)
    }
}
