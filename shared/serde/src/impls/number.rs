use std::mem::size_of;

use crate::{
    buffer_reader::BufferReader, buffer_writer::BufferWrite, error::SerdeErr, serde::Serde,
    ConstByteLength,
};

// Numbers are always little-endian on the wire, whatever the host order.
macro_rules! impl_serde_for_number {
    ($($t:ty),*) => {
        $(
            impl Serde for $t {
                fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
                    writer.write_bytes(&self.to_le_bytes())
                }

                fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr> {
                    let bytes = reader.read_array::<{ size_of::<$t>() }>()?;
                    Ok(<$t>::from_le_bytes(bytes))
                }

                fn byte_length(&self) -> usize {
                    size_of::<$t>()
                }
            }

            impl ConstByteLength for $t {
                fn const_byte_length() -> usize {
                    size_of::<$t>()
                }
            }
        )*
    };
}

impl_serde_for_number!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

impl Serde for bool {
    fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
        writer.write_byte(u8::from(*self))
    }

    fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr> {
        match reader.read_byte()? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(SerdeErr::InvalidValue {
                type_name: "bool",
                reason: "byte is neither 0 nor 1",
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl ConstByteLength for bool {
    fn const_byte_length() -> usize {
        1
    }
}
