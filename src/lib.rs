//! # jsonpipe
//!
//! jsonpipe is a declarative JSON to JSON transformer. A template mirrors the shape of the
//! desired output and every string leaf in it is a small pipeline expression evaluated against
//! the source document:
//!
//! ```text
//! weather.temp $ words $ first $ toFloat
//! ```
//!
//! The first segment selects a value by dotted path (`*` is the whole document), every `$`
//! segment after it applies an operation with optional arguments. Arguments are literals or
//! dotted paths into the source document.
//!
//! Source values that are not found or are incompatible show up as `null` values in the output.
//! Only a broken template, such as an unknown operation or a wrong argument count, fails the
//! transformation.
//!
//! ## Array documents
//!
//! A transformer built with the default [`Mode::Many2Many`](transformer::Mode) treats a top level
//! array as a batch of records: [`apply`](transformer::Transformer::apply) maps the template over
//! every element and returns an array of results. Build with `.mode(Mode::One2One)`, or call
//! [`transform`](transformer::Transformer::transform), to hand the whole array to the template
//! instead:
//!
//! ```rust
//! use jsonpipe::prelude::*;
//! use jsonpipe::errors::Result;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let template = TransformSpec::from(json!({"n": "* $ length"}));
//!     let source = json!(["ab", "cde"]);
//!
//!     let batch = TransformerBuilder::default().build()?;
//!     assert_eq!(json!([{"n": 2}, {"n": 3}]), batch.apply(&template, &source)?);
//!
//!     let whole = TransformerBuilder::default().mode(Mode::One2One).build()?;
//!     assert_eq!(json!({"n": 2}), whole.apply(&template, &source)?);
//!     Ok(())
//! }
//! ```
//!
//! ```rust
//! use jsonpipe::prelude::*;
//! use jsonpipe::errors::Result;
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     let trans = TransformerBuilder::default().build()?;
//!     let template = TransformSpec::from(json!({
//!         "id": "user_id $ toInt",
//!         "name": "full-name $ upper",
//!         "nickname": "nicknames $ first",
//!         "nicknames": "nicknames $ length",
//!         "prev_nested": "nested.inner.key",
//!         "prev_arr": "nested.my_arr $ 1"
//!     }));
//!     let input = r#"
//!         {
//!             "user_id":"111",
//!             "full-name":"Dean Karn",
//!             "nicknames":["Deano","Joey Bloggs"],
//!             "nested": {
//!                 "inner":{
//!                     "key":"value"
//!                 },
//!                 "my_arr":[null,"arr_value",null]
//!             }
//!         }"#;
//!     let expected = r#"{"id":111,"name":"DEAN KARN","nickname":"Deano","nicknames":2,"prev_arr":"arr_value","prev_nested":"value"}"#;
//!     let res = trans.apply_from_str(&template, input)?;
//!     assert_eq!(expected, serde_json::to_string(&res)?);
//!     Ok(())
//! }
//! ```
//!
//! or direct from struct to struct
//!
//! ```rust
//! use jsonpipe::prelude::*;
//! use jsonpipe::errors::Result;
//! use serde::{Serialize, Deserialize};
//! use serde_json::json;
//!
//! fn main() -> Result<()> {
//!     #[derive(Debug, Serialize)]
//!     struct From {
//!         pi: f64,
//!         number: i64,
//!     }
//!
//!     #[derive(Debug, Deserialize, PartialEq)]
//!     struct To {
//!         calculation: f64,
//!     }
//!
//!     let trans = TransformerBuilder::default().build()?;
//!     let template = TransformSpec::from(json!({"calculation": "pi $ + number"}));
//!
//!     let from = From {
//!         pi: 3.14159,
//!         number: 1729,
//!     };
//!
//!     let res: To = trans.apply_to(&template, from)?;
//!     assert_eq!(To { calculation: 1732.14159 }, res);
//!     Ok(())
//! }
//! ```
//!
//! Custom operations are plain functions of the running value and the resolved arguments:
//!
//! ```rust
//! use jsonpipe::prelude::*;
//! use jsonpipe::errors::Result;
//! use serde_json::{json, Value};
//!
//! fn main() -> Result<()> {
//!     let trans = TransformerBuilder::default()
//!         .register_maybe("half", |v: &Value, _: &[Value]| {
//!             Ok(v.as_f64().map_or(Value::Null, |f| json!(f / 2.0)))
//!         })
//!         .build()?;
//!     assert_eq!(json!(1.5), trans.evaluate(&json!({"a": 3}), "a $ half")?);
//!     assert_eq!(Value::Null, trans.evaluate(&json!({}), "a $ half")?);
//!     Ok(())
//! }
//! ```
//!
pub mod errors;
pub mod evaluator;
pub mod extensions;
pub mod functions;
pub mod literal;
pub mod namespace;
pub mod registry;
pub mod template;
pub mod tokenizer;
pub mod transformer;
mod value;

pub mod prelude {
    pub use crate::registry::{Invocation, Registry};
    pub use crate::template::TransformSpec;
    pub use crate::transformer::{Mode, Transformer, TransformerBuilder};
}
