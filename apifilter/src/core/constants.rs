// =============================================================================
// Filter Kinds
// =============================================================================

/// Equality filter token
pub const FILTER_EQUALS: &str = "eq";

/// Greater-than filter token
pub const FILTER_GREATER_THAN: &str = "gt";

/// Less-than filter token
pub const FILTER_LESS_THAN: &str = "lt";

/// Greater-than-or-equal filter token
pub const FILTER_GREATER_THAN_OR_EQUAL: &str = "gte";

/// Less-than-or-equal filter token
pub const FILTER_LESS_THAN_OR_EQUAL: &str = "lte";

/// Membership filter token
pub const FILTER_IN: &str = "in";

/// Function filter token
pub const FILTER_FUNCTION: &str = "function";

/// Function parameter filter token
pub const FILTER_FUNCTION_PARAMETER: &str = "function_parameter";

/// Title of function and function parameter filters
pub const FUNCTION_TITLE: &str = "fun";

// =============================================================================
// Functions
// =============================================================================

/// Default reserved column marking an explicit function definition
pub const DEFAULT_FUNCTION_COLUMN: &str = "fun";

// =============================================================================
// Priorities
// =============================================================================

// Parsers and applicators are tried from the highest priority down; equal
// priorities keep registration order.

/// Tried first
pub const PRIORITY_HIGHEST: i32 = 100;

/// Just below [`PRIORITY_HIGHEST`]
pub const PRIORITY_HIGHER: i32 = 80;

/// Above [`PRIORITY_MEDIUM`]
pub const PRIORITY_HIGH: i32 = 60;

/// Middle of the range
pub const PRIORITY_MEDIUM: i32 = 50;

/// Below [`PRIORITY_MEDIUM`]
pub const PRIORITY_LOW: i32 = 40;

/// Just above [`PRIORITY_LOWEST`]
pub const PRIORITY_LOWER: i32 = 20;

/// Tried last, the fallback
pub const PRIORITY_LOWEST: i32 = 0;

// =============================================================================
// Environment Variables
// =============================================================================

/// Environment variable overriding the reserved function column
pub const ENV_FUNCTION_COLUMN: &str = "APIFILTER_FUNCTION_COLUMN";

/// Environment variable pointing at a JSON config file
pub const ENV_CONFIG: &str = "APIFILTER_CONFIG";
