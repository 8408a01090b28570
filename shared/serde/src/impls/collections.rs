use crate::{
    buffer_reader::BufferReader, buffer_writer::BufferWrite, constants::MAX_COLLECTION_LENGTH,
    error::SerdeErr, serde::Serde,
};

fn ser_length(length: usize, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
    let Ok(prefix) = u16::try_from(length) else {
        return Err(SerdeErr::LengthExceeded {
            length,
            max: MAX_COLLECTION_LENGTH,
        });
    };
    prefix.ser(writer)
}

impl Serde for String {
    fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
        ser_length(self.len(), writer)?;
        writer.write_bytes(self.as_bytes())
    }

    fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr> {
        let length = u16::de(reader)? as usize;
        let bytes = reader.read_bytes(length)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| SerdeErr::InvalidValue {
            type_name: "String",
            reason: "bytes are not valid UTF-8",
        })
    }

    fn byte_length(&self) -> usize {
        2 + self.len()
    }
}

impl<T: Serde> Serde for Vec<T> {
    fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
        ser_length(self.len(), writer)?;
        for item in self {
            item.ser(writer)?;
        }
        Ok(())
    }

    fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr> {
        let length = u16::de(reader)? as usize;
        // a hostile prefix must not drive the allocation
        let mut output = Vec::with_capacity(length.min(reader.remaining()));
        for _ in 0..length {
            output.push(T::de(reader)?);
        }
        Ok(output)
    }

    fn byte_length(&self) -> usize {
        2 + self.iter().map(T::byte_length).sum::<usize>()
    }
}

impl<T: Serde> Serde for Option<T> {
    fn ser(&self, writer: &mut dyn BufferWrite) -> Result<(), SerdeErr> {
        match self {
            Some(value) => {
                true.ser(writer)?;
                value.ser(writer)
            }
            None => false.ser(writer),
        }
    }

    fn de(reader: &mut BufferReader) -> Result<Self, SerdeErr> {
        if bool::de(reader)? {
            Ok(Some(T::de(reader)?))
        } else {
            Ok(None)
        }
    }

    fn byte_length(&self) -> usize {
        1 + self.as_ref().map_or(0, T::byte_length)
    }
}
