//! Scanned value → destination field.
//!
//! Best effort and never failing: a value that does not fit the field
//! leaves the field untouched. Accepted combinations:
//! - NULL → nothing, ever
//! - bool, string, bytes, timestamp → the same kind
//! - float32 / float64 → either float kind (float64 → float32 narrows)
//! - integer of width W → same signedness, width >= W
//! - opaque → a field of exactly the same type

use rowbind_api::{FieldSlot, Value};

/// Store `value` into `slot`. Returns `true` when the field was written.
pub fn coerce(value: &Value, slot: FieldSlot<'_>) -> bool {
    match (value, slot) {
        (Value::Null, _) => false,
        (Value::Bool(v), FieldSlot::Bool(s)) => {
            s.set(*v);
            true
        }
        (Value::Bytes(v), FieldSlot::Bytes(s)) => {
            s.set(v.clone());
            true
        }
        (Value::String(v), FieldSlot::String(s)) => {
            s.set(v.clone());
            true
        }
        (Value::Timestamp(v), FieldSlot::Timestamp(s)) => {
            s.set(*v);
            true
        }
        (Value::Float32(v), slot) => set_float(f64::from(*v), slot),
        (Value::Float64(v), slot) => set_float(*v, slot),
        (Value::Int8(v), slot) => set_signed(i64::from(*v), 8, slot),
        (Value::Int16(v), slot) => set_signed(i64::from(*v), 16, slot),
        (Value::Int32(v), slot) => set_signed(i64::from(*v), 32, slot),
        (Value::Int64(v), slot) => set_signed(*v, 64, slot),
        (Value::UInt8(v), slot) => set_unsigned(u64::from(*v), 8, slot),
        (Value::UInt16(v), slot) => set_unsigned(u64::from(*v), 16, slot),
        (Value::UInt32(v), slot) => set_unsigned(u64::from(*v), 32, slot),
        (Value::UInt64(v), slot) => set_unsigned(*v, 64, slot),
        (Value::Other(v), FieldSlot::Other(dest)) => v.assign_to(dest),
        _ => false,
    }
}

fn set_float(v: f64, slot: FieldSlot<'_>) -> bool {
    match slot {
        FieldSlot::Float32(s) => s.set(v as f32),
        FieldSlot::Float64(s) => s.set(v),
        _ => return false,
    }
    true
}

// `width` is the bit width of the scanned value; the guards keep every cast lossless.
fn set_signed(v: i64, width: u32, slot: FieldSlot<'_>) -> bool {
    match slot {
        FieldSlot::Int8(s) if width <= 8 => s.set(v as i8),
        FieldSlot::Int16(s) if width <= 16 => s.set(v as i16),
        FieldSlot::Int32(s) if width <= 32 => s.set(v as i32),
        FieldSlot::Int64(s) => s.set(v),
        _ => return false,
    }
    true
}

fn set_unsigned(v: u64, width: u32, slot: FieldSlot<'_>) -> bool {
    match slot {
        FieldSlot::UInt8(s) if width <= 8 => s.set(v as u8),
        FieldSlot::UInt16(s) if width <= 16 => s.set(v as u16),
        FieldSlot::UInt32(s) if width <= 32 => s.set(v as u32),
        FieldSlot::UInt64(s) => s.set(v),
        _ => return false,
    }
    true
}
