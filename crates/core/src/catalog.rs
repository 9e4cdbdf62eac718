//! Enumerated vocabulary shared by every layer.
//!
//! Each enum is stored as `TEXT` in PostgreSQL (guarded by a `CHECK`
//! constraint) and serialized with the same spelling in JSON, so the string
//! returned by `as_str()` is the single source of truth for all three.

use crate::error::CoreError;

macro_rules! define_text_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:tt) {
            $( $(#[$vmeta:meta])* $variant:ident => $text:tt ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored / serialized spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            /// Parse from the stored spelling.
            pub fn parse(value: &str) -> Result<Self, CoreError> {
                match value {
                    $($text => Ok($name::$variant),)+
                    other => Err(CoreError::Validation(format!(
                        "Invalid {} '{other}'. Must be one of: {}",
                        $label,
                        [$($text),+].join(", ")
                    ))),
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = CoreError;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                Self::parse(&value)
            }
        }
    };
}

define_text_enum! {
    /// The fixed set of garment categories.
    CategoryName ("category") {
        TShirt => "T-shirt",
        Jeans => "Jeans",
        Dress => "Dress",
        Jacket => "Jacket",
        Sweater => "Sweater",
        Skirt => "Skirt",
        Shorts => "Shorts",
        Coat => "Coat",
        Cap => "Cap",
        Shirt => "Shirt",
    }
}

define_text_enum! {
    /// Demographic an item is cut for.
    ItemType ("type") {
        Men => "men",
        Women => "women",
        Unisex => "unisex",
        Kids => "kids",
    }
}

define_text_enum! {
    /// Garment size label.
    Size ("size") {
        Xs => "XS",
        S => "S",
        M => "M",
        L => "L",
        Xl => "XL",
        Xxl => "XXL",
        Xxxl => "XXXL",
        Other => "Other",
    }
}

define_text_enum! {
    /// Wear condition reported by the uploader.
    Condition ("condition") {
        New => "new",
        LikeNew => "like new",
        Good => "good",
        Fair => "fair",
        Poor => "poor",
    }
}

define_text_enum! {
    /// Availability of an item. `Swapped` is terminal.
    ItemStatus ("status") {
        Available => "available",
        Pending => "pending",
        Swapped => "swapped",
        Removed => "removed",
    }
}

define_text_enum! {
    /// Moderation state of an item, independent of [`ItemStatus`].
    ApprovalStatus ("approval status") {
        Pending => "pending",
        Approved => "approved",
        Rejected => "rejected",
    }
}

define_text_enum! {
    /// What the uploader is willing to accept in exchange.
    SwapPreference ("swap preference") {
        Points => "points",
        Swap => "swap",
        Both => "both",
    }
}

define_text_enum! {
    /// Lifecycle of a swap record.
    SwapStatus ("swap status") {
        Pending => "pending",
        Accepted => "accepted",
        Rejected => "rejected",
        Completed => "completed",
    }
}

define_text_enum! {
    /// Account role.
    Role ("role") {
        User => "user",
        Admin => "admin",
    }
}

impl CategoryName {
    /// Seed description for the category.
    pub fn default_description(self) -> &'static str {
        match self {
            Self::TShirt => "Casual t-shirts and tops",
            Self::Jeans => "Denim jeans and pants",
            Self::Dress => "Dresses for all occasions",
            Self::Jacket => "Jackets and blazers",
            Self::Sweater => "Sweaters and pullovers",
            Self::Skirt => "Skirts of all lengths",
            Self::Shorts => "Shorts and short pants",
            Self::Coat => "Coats and heavy outerwear",
            Self::Cap => "Hats and caps",
            Self::Shirt => "Formal and casual shirts",
        }
    }
}

impl ItemStatus {
    /// Whether the item can still take part in a new or pending swap.
    pub fn is_available(self) -> bool {
        self == Self::Available
    }
}

impl SwapStatus {
    /// Transitions only leave `Pending`; every other state is final with
    /// respect to the swap workflow.
    pub fn can_transition_to(self, next: SwapStatus) -> bool {
        matches!(
            (self, next),
            (
                Self::Pending,
                Self::Accepted | Self::Rejected | Self::Completed
            )
        )
    }
}

/// Whether an item is publicly browsable and eligible for swapping.
pub fn is_listable(status: ItemStatus, approval: ApprovalStatus) -> bool {
    status.is_available() && approval == ApprovalStatus::Approved
}

/// Parse a comma-separated list of approval statuses (`"approved,pending"`).
///
/// Blank segments are ignored; an entirely blank input is an error so the
/// caller never issues a query that matches nothing by accident.
pub fn parse_approval_set(raw: &str) -> Result<Vec<ApprovalStatus>, CoreError> {
    let mut parsed = Vec::new();
    for part in raw.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let status = ApprovalStatus::parse(part)?;
        if !parsed.contains(&status) {
            parsed.push(status);
        }
    }
    if parsed.is_empty() {
        return Err(CoreError::Validation(
            "approvalStatus must name at least one value".to_string(),
        ));
    }
    Ok(parsed)
}
