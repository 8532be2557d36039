use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

// tags and bindings are kept in HashMaps keyed by small integer identities
use core::hash::BuildHasherDefault;
use seahash::SeaHasher;
use std::collections::HashMap;

// used to print out readable forms of a construct
use std::fmt;

// objects keep their fields as JSON and tags may carry any JSON value
use serde_json::{Map, Value as JsonValue};

// our own stuff that we need
use crate::marker::Marker;

pub type MarkerHasher = BuildHasherDefault<SeaHasher>;
pub type ClassHasher = BuildHasherDefault<SeaHasher>;

pub type Fields = Map<String, JsonValue>;

// ------------- Carrier -------------
// A carrier holds the tags of one class template or one object, and links to the
// carrier it inherits from. Tags are never removed or overwritten once stamped.
#[derive(Debug, Default)]
pub struct Carrier {
    tags: RwLock<HashMap<Marker, JsonValue, MarkerHasher>>,
    parent: Option<Arc<Carrier>>,
}

impl Carrier {
    pub fn new(parent: Option<Arc<Carrier>>) -> Self {
        Self {
            tags: RwLock::new(HashMap::default()),
            parent,
        }
    }
    pub fn parent(&self) -> Option<&Arc<Carrier>> {
        self.parent.as_ref()
    }
    // A poisoned lock only means a writer panicked between two inserts; the map itself
    // is still a valid set of tags.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<Marker, JsonValue, MarkerHasher>> {
        self.tags.read().unwrap_or_else(PoisonError::into_inner)
    }
    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Marker, JsonValue, MarkerHasher>> {
        self.tags.write().unwrap_or_else(PoisonError::into_inner)
    }
    /// Stamps every marker that is not already an own tag, under a single write lock.
    /// Returns the number of tags that were added.
    pub fn stamp<I>(&self, tags: I) -> usize
    where
        I: IntoIterator<Item = (Marker, JsonValue)>,
    {
        let mut kept = self.write();
        let mut stamped = 0;
        for (marker, value) in tags {
            if !kept.contains_key(&marker) {
                kept.insert(marker, value);
                stamped += 1;
            }
        }
        stamped
    }
    pub fn has_own(&self, marker: Marker) -> bool {
        self.read().contains_key(&marker)
    }
    pub fn own_len(&self) -> usize {
        self.read().len()
    }
    /// True if the marker is an own tag or is carried by any ancestor.
    pub fn carries(&self, marker: Marker) -> bool {
        let mut carrier = Some(self);
        while let Some(current) = carrier {
            if current.has_own(marker) {
                return true;
            }
            carrier = current.parent.as_deref();
        }
        false
    }
    /// The value of the nearest tag for the marker, own tags shadowing inherited ones.
    pub fn tag_value(&self, marker: Marker) -> Option<JsonValue> {
        let mut carrier = Some(self);
        while let Some(current) = carrier {
            if let Some(value) = current.read().get(&marker) {
                return Some(value.clone());
            }
            carrier = current.parent.as_deref();
        }
        None
    }
    /// True if `ancestor` is found among the parents of this carrier (not itself).
    pub fn descends_from(&self, ancestor: &Arc<Carrier>) -> bool {
        let mut carrier = self.parent.as_ref();
        while let Some(current) = carrier {
            if Arc::ptr_eq(current, ancestor) {
                return true;
            }
            carrier = current.parent.as_ref();
        }
        false
    }
}

// ------------- Class -------------
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct ClassId(u64);

static CLASS_LOWER_BOUND: AtomicU64 = AtomicU64::new(0);

impl ClassId {
    fn generate() -> Self {
        Self(CLASS_LOWER_BOUND.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "class#{}", self.0)
    }
}

#[derive(Debug)]
struct ClassData {
    id: ClassId,
    name: String,
    parent: Option<Class>,
    // the instance-template, shared by every instance and every subclass template
    template: Arc<Carrier>,
}

/// A class with single native inheritance. Cloning a class clones the handle, not the
/// class, so every clone shares identity and template.
#[derive(Clone, Debug)]
pub struct Class {
    data: Arc<ClassData>,
}

impl Class {
    pub fn new(name: impl Into<String>) -> Self {
        Self::define(name.into(), None)
    }
    pub fn extends(name: impl Into<String>, parent: &Class) -> Self {
        Self::define(name.into(), Some(parent.clone()))
    }
    fn define(name: String, parent: Option<Class>) -> Self {
        let template = Arc::new(Carrier::new(
            parent.as_ref().map(|p| Arc::clone(&p.data.template)),
        ));
        Self {
            data: Arc::new(ClassData {
                id: ClassId::generate(),
                name,
                parent,
                template,
            }),
        }
    }
    pub fn id(&self) -> ClassId {
        self.data.id
    }
    pub fn name(&self) -> &str {
        &self.data.name
    }
    pub fn parent(&self) -> Option<&Class> {
        self.data.parent.as_ref()
    }
    pub fn template(&self) -> &Arc<Carrier> {
        &self.data.template
    }
    pub fn instantiate(&self, fields: Fields) -> Object {
        Object::create(Some(self.clone()), fields)
    }
    /// True if `self` is `other` or one of its ancestors.
    pub fn is_superclass_of(&self, other: &Class) -> bool {
        let mut class = Some(other);
        while let Some(current) = class {
            if current == self {
                return true;
            }
            class = current.parent();
        }
        false
    }
    /// The native "is-a" check: the value is an object whose carrier chain passes through
    /// this class's template.
    pub fn is_ancestor_of(&self, value: &Value) -> bool {
        match value {
            Value::Object(object) => object.data.carrier.descends_from(&self.data.template),
            _ => false,
        }
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.data.id == other.data.id
    }
}
impl Eq for Class {}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.parent() {
            Some(parent) => write!(f, "{} extends {}", self.name(), parent.name()),
            None => write!(f, "{}", self.name()),
        }
    }
}

// ------------- Object -------------
#[derive(Debug)]
struct ObjectData {
    class: Option<Class>,
    carrier: Carrier,
    fields: Fields,
}

#[derive(Clone, Debug)]
pub struct Object {
    data: Arc<ObjectData>,
}

impl Object {
    /// A plain object: no class, nothing to inherit tags from.
    pub fn plain(fields: Fields) -> Self {
        Self::create(None, fields)
    }
    pub fn empty() -> Self {
        Self::plain(Fields::new())
    }
    fn create(class: Option<Class>, fields: Fields) -> Self {
        let parent = class.as_ref().map(|c| Arc::clone(c.template()));
        Self {
            data: Arc::new(ObjectData {
                class,
                carrier: Carrier::new(parent),
                fields,
            }),
        }
    }
    pub fn class(&self) -> Option<&Class> {
        self.data.class.as_ref()
    }
    pub fn get(&self, field: &str) -> Option<&JsonValue> {
        self.data.fields.get(field)
    }
    pub fn fields(&self) -> &Fields {
        &self.data.fields
    }
    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.data, &other.data)
    }
}

impl fmt::Display for Object {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let fields = JsonValue::Object(self.data.fields.clone());
        match self.class() {
            Some(class) => write!(f, "{} {}", class.name(), fields),
            None => write!(f, "{}", fields),
        }
    }
}

// ------------- Implementor -------------
/// Anything that can carry tags: a class (on its template, so every instance inherits
/// them) or an object (on the object itself).
pub trait Implementor {
    fn carrier(&self) -> &Carrier;
    fn describe(&self) -> String;
    fn has_own_tag(&self, marker: Marker) -> bool {
        self.carrier().has_own(marker)
    }
    fn carries(&self, marker: Marker) -> bool {
        self.carrier().carries(marker)
    }
    fn tag_value(&self, marker: Marker) -> Option<JsonValue> {
        self.carrier().tag_value(marker)
    }
}

impl Implementor for Class {
    fn carrier(&self) -> &Carrier {
        &self.data.template
    }
    fn describe(&self) -> String {
        format!("class {}", self.name())
    }
}

impl Implementor for Object {
    fn carrier(&self) -> &Carrier {
        &self.data.carrier
    }
    fn describe(&self) -> String {
        match self.class() {
            Some(class) => format!("instance of {}", class.name()),
            None => String::from("plain object"),
        }
    }
}

impl<T: Implementor + ?Sized> Implementor for &T {
    fn carrier(&self) -> &Carrier {
        (**self).carrier()
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
}

// ------------- Value -------------
/// Any candidate on the left-hand side of an "is-a" check.
#[derive(Clone, Debug, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Array(Vec<Value>),
    Object(Object),
}

impl Value {
    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(object) => Some(object),
            _ => None,
        }
    }
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}
impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Number(f64::from(n))
    }
}
impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}
impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_owned())
    }
}
impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}
impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}
impl From<&Object> for Value {
    fn from(object: &Object) -> Self {
        Value::Object(object.clone())
    }
}
impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(option: Option<T>) -> Self {
        option.map_or(Value::Null, Into::into)
    }
}
// JSON objects become fresh, untagged plain objects.
impl From<JsonValue> for Value {
    fn from(json: JsonValue) -> Self {
        match json {
            JsonValue::Null => Value::Null,
            JsonValue::Bool(b) => Value::Bool(b),
            JsonValue::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            JsonValue::String(s) => Value::String(s),
            JsonValue::Array(items) => Value::Array(items.into_iter().map(Value::from).collect()),
            JsonValue::Object(fields) => Value::Object(Object::plain(fields)),
        }
    }
}
