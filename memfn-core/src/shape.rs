//! Shape scan of an argument list.
//!
//! `serde_json` writes every non-finite float as `null` and cannot tell a
//! 1-tuple from a one-element `Vec`. This serializer walks the arguments
//! once, writing nothing, and records the facts key derivation needs before
//! the JSON step erases them.

use crate::error::KeyError;
use serde::ser::{self, Serialize};

/// What the outermost value of an argument list was serialized as.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Outer {
    /// A float that JSON cannot represent
    NonFinite(f64),
    /// `serialize_tuple` with a single element, i.e. `(x,)` or `[x; 1]`
    Single,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Shape {
    pub outer: Outer,
    /// The element of a single-element tuple when it is a non-finite float
    pub single_non_finite: Option<f64>,
    /// Non-finite floats anywhere else
    pub buried_non_finite: bool,
}

impl Shape {
    /// The non-finite float standing as the whole argument, if any.
    pub fn lone_non_finite(&self) -> Option<f64> {
        match self.outer {
            Outer::NonFinite(v) => Some(v),
            Outer::Single => self.single_non_finite,
            Outer::Other => None,
        }
    }
}

pub(crate) fn scan<A: Serialize + ?Sized>(args: &A) -> Result<Shape, KeyError> {
    let mut scanner = Scanner {
        depth: 0,
        shape: Shape {
            outer: Outer::Other,
            single_non_finite: None,
            buried_non_finite: false,
        },
    };
    args.serialize(&mut scanner)?;
    Ok(scanner.shape)
}

struct Scanner {
    depth: usize,
    shape: Shape,
}

impl Scanner {
    fn float(&mut self, v: f64) {
        if v.is_finite() {
            return;
        }
        match (self.depth, self.shape.outer) {
            (0, _) => self.shape.outer = Outer::NonFinite(v),
            (1, Outer::Single) => self.shape.single_non_finite = Some(v),
            _ => self.shape.buried_non_finite = true,
        }
    }

    fn open(&mut self) -> Result<&mut Self, KeyError> {
        self.depth += 1;
        Ok(self)
    }

    fn close(&mut self) -> Result<(), KeyError> {
        self.depth -= 1;
        Ok(())
    }
}

impl<'a> ser::Serializer for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;
    type SerializeSeq = Self;
    type SerializeTuple = Self;
    type SerializeTupleStruct = Self;
    type SerializeTupleVariant = Self;
    type SerializeMap = Self;
    type SerializeStruct = Self;
    type SerializeStructVariant = Self;

    fn serialize_bool(self, _: bool) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_i8(self, _: i8) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_i16(self, _: i16) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_i32(self, _: i32) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_i64(self, _: i64) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_i128(self, _: i128) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_u8(self, _: u8) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_u16(self, _: u16) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_u32(self, _: u32) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_u64(self, _: u64) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_u128(self, _: u128) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_f32(self, v: f32) -> Result<(), KeyError> {
        self.float(f64::from(v));
        Ok(())
    }

    fn serialize_f64(self, v: f64) -> Result<(), KeyError> {
        self.float(v);
        Ok(())
    }

    fn serialize_char(self, _: char) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_str(self, _: &str) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_bytes(self, _: &[u8]) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_none(self) -> Result<(), KeyError> {
        Ok(())
    }

    // Options and newtypes are transparent in JSON, so they are here too
    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<(), KeyError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
    ) -> Result<(), KeyError> {
        Ok(())
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        value: &T,
    ) -> Result<(), KeyError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        value: &T,
    ) -> Result<(), KeyError> {
        self.depth += 1;
        value.serialize(&mut *self)?;
        self.close()
    }

    fn serialize_seq(self, _: Option<usize>) -> Result<Self, KeyError> {
        self.open()
    }

    fn serialize_tuple(self, len: usize) -> Result<Self, KeyError> {
        if self.depth == 0 && len == 1 {
            self.shape.outer = Outer::Single;
        }
        self.open()
    }

    fn serialize_tuple_struct(self, _: &'static str, _: usize) -> Result<Self, KeyError> {
        self.open()
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, KeyError> {
        self.open()
    }

    fn serialize_map(self, _: Option<usize>) -> Result<Self, KeyError> {
        self.open()
    }

    fn serialize_struct(self, _: &'static str, _: usize) -> Result<Self, KeyError> {
        self.open()
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        _: &'static str,
        _: usize,
    ) -> Result<Self, KeyError> {
        self.open()
    }
}

impl<'a> ser::SerializeSeq for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), KeyError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), KeyError> {
        self.close()
    }
}

impl<'a> ser::SerializeTuple for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), KeyError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), KeyError> {
        self.close()
    }
}

impl<'a> ser::SerializeTupleStruct for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), KeyError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), KeyError> {
        self.close()
    }
}

impl<'a> ser::SerializeTupleVariant for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), KeyError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), KeyError> {
        self.close()
    }
}

impl<'a> ser::SerializeMap for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), KeyError> {
        key.serialize(&mut **self)
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), KeyError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), KeyError> {
        self.close()
    }
}

impl<'a> ser::SerializeStruct for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), KeyError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), KeyError> {
        self.close()
    }
}

impl<'a> ser::SerializeStructVariant for &'a mut Scanner {
    type Ok = ();
    type Error = KeyError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        _: &'static str,
        value: &T,
    ) -> Result<(), KeyError> {
        value.serialize(&mut **self)
    }

    fn end(self) -> Result<(), KeyError> {
        self.close()
    }
}
