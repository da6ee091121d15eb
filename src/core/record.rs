//! # Record Serializer
//!
//! Records are declared once as an ordered field table and get their wire
//! encoding generated from it:
//!
//! ```ignore
//! wire_record! {
//!     #[derive(Debug, Clone, PartialEq, Eq)]
//!     pub struct SlaveInfo {
//!         pub id: PeerId,
//!         pub ip: u128,
//!         pub port: u16,
//!         pub shard_mask_list: Vec<ShardMask>,
//!     }
//! }
//! ```
//!
//! Each field is encoded by its type's [`Wire`] impl, or by the codec named
//! after `=>` (e.g. `pub payload: Vec<u8> => PrefixedBytes<4>`). Fields are
//! written in declaration order and read back in the same order; the record
//! value is only assembled after the last field decoded, so a failure never
//! leaks a partially populated record. A record with no fields encodes to
//! zero bytes.

use crate::core::wire::Wire;

/// Static description of a record's field table
pub trait Record: Wire {
    /// Type name of the record
    const NAME: &'static str;
    /// Field names in wire order
    const FIELDS: &'static [&'static str];
}

macro_rules! wire_record {
    (@codec $ty:ty) => { $crate::core::container::Native };
    (@codec $ty:ty, $codec:ty) => { $codec };

    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$fmeta:meta])*
                $fvis:vis $field:ident : $ty:ty $(=> $codec:ty)?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$fmeta])*
                $fvis $field: $ty,
            )*
        }

        impl $crate::core::record::Record for $name {
            const NAME: &'static str = stringify!($name);
            const FIELDS: &'static [&'static str] = &[$(stringify!($field)),*];
        }

        impl $crate::core::wire::Wire for $name {
            #[allow(unused_variables)]
            fn encode_to(&self, buf: &mut ::bytes::BytesMut) -> $crate::error::Result<()> {
                $(
                    <$crate::core::record::wire_record!(@codec $ty $(, $codec)?)
                        as $crate::core::container::FieldCodec<$ty>>::encode_field(&self.$field, buf)?;
                )*
                Ok(())
            }

            #[allow(unused_variables)]
            fn decode_from(
                reader: &mut $crate::core::reader::WireReader<'_>,
            ) -> $crate::error::Result<Self> {
                $(
                    let $field = <$crate::core::record::wire_record!(@codec $ty $(, $codec)?)
                        as $crate::core::container::FieldCodec<$ty>>::decode_field(reader)?;
                )*
                Ok(Self { $($field),* })
            }
        }
    };
}

pub(crate) use wire_record;
