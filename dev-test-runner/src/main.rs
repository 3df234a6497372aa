//! Developer smoke runner: declares a realistic chat-update model, feeds it
//! raw payload samples, and prints the derived schema plus round-trip
//! results.

use anyhow::{Context, anyhow};
use json_bind::{
    AliasTable, Arr, Compound, ConversionError, INT_CONV, MaybeMissing, Obj, OptionalConv,
    STRING_CONV, compound_conv,
};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Realistic bot-update payloads: nested records, aliased keys (`from`),
/// maybe-missing fields, nullable fields, and server-side extras the model
/// does not declare.
fn realistic_samples() -> Vec<&'static str> {
    vec![
        r#"{
            "update_id": 91120013,
            "message": {
                "message_id": 5,
                "from": {
                    "id": 530716123,
                    "is_bot": false,
                    "first_name": "monedu1a",
                    "username": "be_patient",
                    "language_code": "en"
                },
                "date": 1632911451,
                "text": "foo"
            }
        }"#,
        r#"{
            "update_id": 91120015,
            "message": {
                "message_id": 6,
                "from": {
                    "id": 530716166,
                    "username": "joe",
                    "language_code": null
                },
                "text": "bar"
            }
        }"#,
        r#"{"update_id": 91120020}"#,
    ]
}

#[derive(Debug, Clone, Default, PartialEq)]
struct User {
    id: i64,
    username: MaybeMissing<String>,
    language_code: MaybeMissing<Option<String>>,
}

static USER_OBJ: Lazy<Obj<User>> = Lazy::new(|| {
    Obj::new()
        .field("id", &*INT_CONV, |u: &User| &u.id, |u, v| u.id = v)
        .maybe_field("username", &*STRING_CONV, |u: &User| &u.username, |u, v| u.username = v)
        .maybe_field(
            "language_code",
            OptionalConv(&*STRING_CONV),
            |u: &User| &u.language_code,
            |u, v| u.language_code = v,
        )
});

impl Compound for User {
    fn from_json(value: &Value) -> Result<Self, ConversionError> {
        USER_OBJ.from_json(value)
    }

    fn as_json(&self) -> Result<Value, ConversionError> {
        USER_OBJ.as_json(self)
    }

    fn schema() -> Value {
        USER_OBJ.schema()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Message {
    message_id: i64,
    from_: MaybeMissing<User>,
    date: MaybeMissing<i64>,
    text: MaybeMissing<String>,
}

static MESSAGE_OBJ: Lazy<Obj<Message>> = Lazy::new(|| {
    Obj::with_aliases(AliasTable::new([("from_", "from")]).expect("aliases are injective"))
        .field("message_id", &*INT_CONV, |m: &Message| &m.message_id, |m, v| m.message_id = v)
        .maybe_field("from_", compound_conv::<User>(), |m: &Message| &m.from_, |m, v| m.from_ = v)
        .maybe_field("date", &*INT_CONV, |m: &Message| &m.date, |m, v| m.date = v)
        .maybe_field("text", &*STRING_CONV, |m: &Message| &m.text, |m, v| m.text = v)
});

impl Compound for Message {
    fn from_json(value: &Value) -> Result<Self, ConversionError> {
        MESSAGE_OBJ.from_json(value)
    }

    fn as_json(&self) -> Result<Value, ConversionError> {
        MESSAGE_OBJ.as_json(self)
    }

    fn schema() -> Value {
        MESSAGE_OBJ.schema()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Update {
    update_id: i64,
    message: MaybeMissing<Message>,
}

static UPDATE_OBJ: Lazy<Obj<Update>> = Lazy::new(|| {
    Obj::new()
        .field("update_id", &*INT_CONV, |u: &Update| &u.update_id, |u, v| u.update_id = v)
        .maybe_field("message", compound_conv::<Message>(), |u: &Update| &u.message, |u, v| {
            u.message = v
        })
});

impl Compound for Update {
    fn from_json(value: &Value) -> Result<Self, ConversionError> {
        UPDATE_OBJ.from_json(value)
    }

    fn as_json(&self) -> Result<Value, ConversionError> {
        UPDATE_OBJ.as_json(self)
    }

    fn schema() -> Value {
        UPDATE_OBJ.schema()
    }
}

static UPDATES_ARR: Lazy<Arr<Update>> = Lazy::new(|| Arr::new(compound_conv::<Update>()));

/// Deserialize with JSON-path context in error messages.
fn from_str_with_path<T: DeserializeOwned>(src: &str) -> anyhow::Result<T> {
    let de = &mut serde_json::Deserializer::from_str(src);
    serde_path_to_error::deserialize::<_, T>(de).map_err(|err| {
        let path = err.path().to_string();
        anyhow!("at JSON path {path} → {}", err.into_inner())
    })
}

fn main() -> anyhow::Result<()> {
    // 1) parse the raw samples into the generic value tree
    let values: Vec<Value> = realistic_samples()
        .into_iter()
        .map(from_str_with_path)
        .collect::<anyhow::Result<_>>()?;

    // 2) typed instances, one per sample
    let mut updates = Vec::new();
    for (i, value) in values.iter().enumerate() {
        let update =
            Update::from_json(value).with_context(|| format!("parsing sample #{i}"))?;
        eprintln!("✔ sample #{i}: {update:?}");
        updates.push(update);
    }

    // 3) round-trip every instance through the wire shape
    let dumped = UPDATES_ARR.as_json(&updates)?;
    let reparsed = UPDATES_ARR.from_json(&dumped)?;
    assert_eq!(reparsed, updates, "round-trip must preserve instances");
    eprintln!("✔ {} updates round-tripped", updates.len());

    // 4) emit the derived schema
    println!("{}", serde_json::to_string_pretty(&Update::schema())?);
    Ok(())
}
