use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use infinitable::{Record, SortSpec, TableOptions};

use crate::AdapterError;

/// The operations a host can reach by name.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Method {
    Init,
    Destroy,
    Refresh,
    Sort,
    Filter,
    Get,
    Set,
}

impl Method {
    pub const ALL: [Method; 7] = [
        Method::Init,
        Method::Destroy,
        Method::Refresh,
        Method::Sort,
        Method::Filter,
        Method::Get,
        Method::Set,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Init => "init",
            Method::Destroy => "destroy",
            Method::Refresh => "refresh",
            Method::Sort => "sort",
            Method::Filter => "filter",
            Method::Get => "get",
            Method::Set => "set",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses a method name. The empty name means `init`.
impl FromStr for Method {
    type Err = AdapterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(Method::Init);
        }
        Method::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| AdapterError::UnknownMethod(s.to_string()))
    }
}

/// Arguments for a named call. Each [`Method`] accepts exactly one shape.
pub enum Args<T: Record> {
    /// `destroy` and `refresh`.
    None,
    Init {
        options: TableOptions,
        items: Vec<T>,
    },
    Sort(SortSpec),
    Filter {
        column: Option<String>,
        query: Option<String>,
    },
    Get(T::Id),
    Set {
        item: T,
        force_display_update: bool,
    },
}

impl<T: Record> Args<T> {
    /// Whether this shape is the one `method` accepts.
    pub fn fits(&self, method: Method) -> bool {
        matches!(
            (method, self),
            (Method::Init, Args::Init { .. })
                | (Method::Destroy, Args::None)
                | (Method::Refresh, Args::None)
                | (Method::Sort, Args::Sort(_))
                | (Method::Filter, Args::Filter { .. })
                | (Method::Get, Args::Get(_))
                | (Method::Set, Args::Set { .. })
        )
    }
}

impl<T: Record> fmt::Debug for Args<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Args::None => f.write_str("None"),
            Args::Init { options, items } => f
                .debug_struct("Init")
                .field("options", options)
                .field("items", &items.len())
                .finish(),
            Args::Sort(spec) => f.debug_tuple("Sort").field(spec).finish(),
            Args::Filter { column, query } => f
                .debug_struct("Filter")
                .field("column", column)
                .field("query", query)
                .finish(),
            Args::Get(_) => f.write_str("Get"),
            Args::Set {
                force_display_update,
                ..
            } => f
                .debug_struct("Set")
                .field("force_display_update", force_display_update)
                .finish_non_exhaustive(),
        }
    }
}
