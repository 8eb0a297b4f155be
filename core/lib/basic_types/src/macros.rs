/// Declares a newtype over a primitive unsigned integer, with the conversions
/// shared by all numeric identifiers in the SDK.
///
/// Conversions from [`U256`](crate::U256) are checked: values that do not fit into the
/// underlying type produce a [`ConversionError`](crate::conversions::ConversionError).
macro_rules! basic_type {
    ($(#[$attr:meta])* $name:ident, $type:ty) => {
        $(#[$attr])*
        #[derive(
            Debug, Default, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(pub $type);

        impl $name {
            /// Returns the next value, saturating at the type bound.
            pub fn next(self) -> $name {
                $name(self.0.saturating_add(1))
            }

            pub fn as_u64(self) -> u64 {
                self.0 as u64
            }
        }

        impl Deref for $name {
            type Target = $type;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let value = s.parse::<$type>()?;
                Ok(Self(value))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<$type> for $name {
            fn from(value: $type) -> Self {
                Self(value)
            }
        }

        impl TryFrom<U256> for $name {
            type Error = ConversionError;

            fn try_from(value: U256) -> Result<Self, Self::Error> {
                if value > U256::from(<$type>::MAX) {
                    return Err(ConversionError::Overflow {
                        what: stringify!($name),
                        value,
                    });
                }
                Ok(Self(value.low_u64() as $type))
            }
        }
    };
}
