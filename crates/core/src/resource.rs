//! Static resource descriptors.
//!
//! Every list/CRUD screen of the portal is the same query pattern applied to
//! a different table. A [`ResourceDescriptor`] captures everything that
//! varies: the table and its columns, joined relations, searchable columns,
//! equality filters, default ordering and the derived display fields.

use crate::error::CoreError;
use crate::filters::SortDirection;
use crate::record::{FieldKind, FieldValue};

// ---------------------------------------------------------------------------
// Building blocks
// ---------------------------------------------------------------------------

/// A column of the backing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    /// Whether create/update accept this column from callers.
    pub writable: bool,
}

impl FieldSpec {
    pub const fn writable(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            writable: true,
        }
    }

    pub const fn read_only(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            writable: false,
        }
    }
}

/// How a filter parameter constrains its column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterMode {
    /// `column = value`.
    Exact,
    /// `A` means `column = true`, any other value `column = false`.
    ActiveFlag,
    /// Comma-separated values, `column IN (...)`.
    AnyOf,
}

/// A resource-specific equality filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterSpec {
    /// Name of the filter in the criteria map.
    pub param: &'static str,
    /// Column it constrains.
    pub column: &'static str,
    pub mode: FilterMode,
}

impl FilterSpec {
    pub const fn exact(param: &'static str, column: &'static str) -> Self {
        Self {
            param,
            column,
            mode: FilterMode::Exact,
        }
    }
}

/// A text predicate that always holds for a resource (e.g. `contact_type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPredicate {
    pub column: &'static str,
    pub value: &'static str,
}

/// A many-to-one join resolved alongside the base row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    /// Key of the joined row in a fetched result.
    pub name: &'static str,
    pub table: &'static str,
    /// Column of the base table referencing `table.id`.
    pub foreign_key: &'static str,
    /// Columns fetched from the joined table.
    pub columns: &'static [&'static str],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    pub column: &'static str,
    pub direction: SortDirection,
}

impl SortKey {
    pub const fn asc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Asc,
        }
    }

    pub const fn desc(column: &'static str) -> Self {
        Self {
            column,
            direction: SortDirection::Desc,
        }
    }
}

/// Rule computing a derived display field from a fetched row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayRule {
    /// A column of a joined relation; empty when the relation is absent.
    RelationField {
        relation: &'static str,
        field: &'static str,
    },
    /// Non-empty base columns joined by `separator`.
    Joined {
        fields: &'static [&'static str],
        separator: &'static str,
    },
    /// Company, else "first last", else nick name.
    ContactName { relation: &'static str },
    /// Nick name, else "first last".
    InstructorName { relation: &'static str },
    /// "color brand model (plate)", skipping missing parts.
    VehicleInfo { relation: &'static str },
    /// The amount when non-negative, else zero.
    Inflow { amount: &'static str },
    /// The absolute amount when negative, else zero.
    Outflow { amount: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DerivedField {
    pub name: &'static str,
    pub rule: DisplayRule,
}

/// Value assigned on create when the caller omits a column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text(&'static str),
    Integer(i64),
    Bool(bool),
}

impl DefaultValue {
    pub fn to_value(self) -> FieldValue {
        match self {
            DefaultValue::Text(s) => FieldValue::Text(s.to_string()),
            DefaultValue::Integer(i) => FieldValue::Integer(i),
            DefaultValue::Bool(b) => FieldValue::Bool(b),
        }
    }
}

/// A signed amount written from separate inflow/outflow inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignedAmount {
    pub target: &'static str,
    pub inflow: &'static str,
    pub outflow: &'static str,
}

// ---------------------------------------------------------------------------
// ResourceDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct ResourceDescriptor {
    /// Name used by callers (`contacts`, `vehicles`, ...).
    pub name: &'static str,
    /// Singular entity name used in error messages.
    pub entity: &'static str,
    pub table: &'static str,
    pub fields: &'static [FieldSpec],
    pub relations: &'static [Relation],
    pub searchable: &'static [&'static str],
    pub filters: &'static [FilterSpec],
    pub fixed: &'static [FixedPredicate],
    /// Whether `branch_id` filtering and authorization scoping apply.
    pub branch_scoped: bool,
    /// Column constrained by `date_from` / `date_to`.
    pub date_field: Option<&'static str>,
    pub default_sort: SortKey,
    /// Tie-breaker applied unless the primary sort is already this column.
    pub secondary_sort: Option<SortKey>,
    /// Alternative column names accepted from callers, for sorting and writes.
    pub column_aliases: &'static [(&'static str, &'static str)],
    pub derived: &'static [DerivedField],
    pub defaults: &'static [(&'static str, DefaultValue)],
    pub signed_amount: Option<SignedAmount>,
}

impl ResourceDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn filter(&self, param: &str) -> Option<&'static FilterSpec> {
        self.filters.iter().find(|f| f.param == param)
    }

    pub fn is_writable(&self, name: &str) -> bool {
        self.field(name).is_some_and(|f| f.writable)
    }

    /// The column `name` stands for, following [`column_aliases`](Self::column_aliases).
    pub fn column_name<'a>(&self, name: &'a str) -> &'a str {
        self.column_aliases
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, column)| *column)
    }

    /// Resolve a caller-supplied sort name to a known column.
    ///
    /// Falls back to the default sort column when `requested` is `None`.
    /// Unknown names are rejected so arbitrary text never reaches `ORDER BY`.
    pub fn sort_column(&self, requested: Option<&str>) -> Result<&'static str, CoreError> {
        let Some(requested) = requested else {
            return Ok(self.default_sort.column);
        };

        self.field(self.column_name(requested)).map(|f| f.name).ok_or_else(|| {
            CoreError::invalid(format!("cannot sort {} by '{requested}'", self.name))
        })
    }
}

// ---------------------------------------------------------------------------
// Shared column sets
// ---------------------------------------------------------------------------

use FieldKind::{Boolean, Date, Decimal, Integer, Text, Timestamp};

const ID: FieldSpec = FieldSpec::read_only("id", Integer);
const CREATED_AT: FieldSpec = FieldSpec::read_only("created_at", Timestamp);
const UPDATED_AT: FieldSpec = FieldSpec::read_only("updated_at", Timestamp);

const BRANCH_RELATION: Relation = Relation {
    name: "branch",
    table: "w_branches",
    foreign_key: "branch_id",
    columns: &["id", "name"],
};

const BRANCH_NAME: DerivedField = DerivedField {
    name: "branch_name",
    rule: DisplayRule::RelationField {
        relation: "branch",
        field: "name",
    },
};

const PERSON_FULL_NAME: DerivedField = DerivedField {
    name: "full_name",
    rule: DisplayRule::Joined {
        fields: &["first_name", "middle_name", "last_name"],
        separator: " ",
    },
};

const STATUS_ACTIVE: (&str, DefaultValue) = ("status", DefaultValue::Text("A"));

const CONTACT_FIELDS: &[FieldSpec] = &[
    ID,
    FieldSpec::writable("branch_id", Integer),
    FieldSpec::writable("contact_type", Text),
    FieldSpec::writable("company", Text),
    FieldSpec::writable("first_name", Text),
    FieldSpec::writable("middle_name", Text),
    FieldSpec::writable("last_name", Text),
    FieldSpec::writable("nick_name", Text),
    FieldSpec::writable("contact_status", Text),
    FieldSpec::writable("license_code", Text),
    FieldSpec::writable("referral_type", Text),
    FieldSpec::writable("email", Text),
    FieldSpec::writable("phone1", Text),
    FieldSpec::writable("phone2", Text),
    FieldSpec::writable("address1", Text),
    FieldSpec::writable("address2", Text),
    FieldSpec::writable("region", Text),
    FieldSpec::writable("city", Text),
    FieldSpec::writable("zip_code", Text),
    FieldSpec::writable("gender", Text),
    FieldSpec::writable("birthday", Date),
    FieldSpec::read_only("photo", Text),
    FieldSpec::read_only("updated_by", Integer),
    CREATED_AT,
    UPDATED_AT,
];

const CONTACT_DEFAULTS: &[(&str, DefaultValue)] =
    &[("contact_status", DefaultValue::Text("A"))];

const CONTACT_STATUS_FILTER: FilterSpec = FilterSpec::exact("status", "contact_status");

// ---------------------------------------------------------------------------
// Catalogue
// ---------------------------------------------------------------------------

pub static CONTACTS: ResourceDescriptor = ResourceDescriptor {
    name: "contacts",
    entity: "Contact",
    table: "w_contacts",
    fields: CONTACT_FIELDS,
    relations: &[BRANCH_RELATION],
    searchable: &["first_name", "last_name", "company", "email", "phone1"],
    filters: &[
        FilterSpec::exact("contact_type", "contact_type"),
        CONTACT_STATUS_FILTER,
    ],
    fixed: &[],
    branch_scoped: true,
    date_field: None,
    default_sort: SortKey::desc("created_at"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[BRANCH_NAME, PERSON_FULL_NAME],
    defaults: CONTACT_DEFAULTS,
    signed_amount: None,
};

pub static EMPLOYEES: ResourceDescriptor = ResourceDescriptor {
    name: "employees",
    entity: "Employee",
    table: "w_contacts",
    fields: CONTACT_FIELDS,
    relations: &[BRANCH_RELATION],
    searchable: &["first_name", "last_name", "nick_name", "email", "phone1"],
    filters: &[CONTACT_STATUS_FILTER],
    fixed: &[FixedPredicate {
        column: "contact_type",
        value: "EMPLOYEE",
    }],
    branch_scoped: true,
    date_field: None,
    default_sort: SortKey::asc("last_name"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[BRANCH_NAME, PERSON_FULL_NAME],
    defaults: CONTACT_DEFAULTS,
    signed_amount: None,
};

pub static STUDENTS: ResourceDescriptor = ResourceDescriptor {
    name: "students",
    entity: "Student",
    table: "w_contacts",
    fields: CONTACT_FIELDS,
    relations: &[BRANCH_RELATION],
    searchable: &["first_name", "last_name", "email", "phone1", "license_code"],
    filters: &[CONTACT_STATUS_FILTER],
    fixed: &[FixedPredicate {
        column: "contact_type",
        value: "STUDENT",
    }],
    branch_scoped: true,
    date_field: None,
    default_sort: SortKey::desc("created_at"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[BRANCH_NAME, PERSON_FULL_NAME],
    defaults: CONTACT_DEFAULTS,
    signed_amount: None,
};

pub static VEHICLES: ResourceDescriptor = ResourceDescriptor {
    name: "vehicles",
    entity: "Vehicle",
    table: "w_vehicles",
    fields: &[
        ID,
        FieldSpec::writable("branch_id", Integer),
        FieldSpec::writable("brand", Text),
        FieldSpec::writable("model", Text),
        FieldSpec::writable("color", Text),
        FieldSpec::writable("plate_number", Text),
        FieldSpec::writable("start_date", Date),
        FieldSpec::writable("price_purchased", Decimal),
        FieldSpec::writable("end_date", Date),
        FieldSpec::writable("price_sold", Decimal),
        FieldSpec::writable("status", Text),
        FieldSpec::read_only("updated_by", Integer),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[BRANCH_RELATION],
    searchable: &["brand", "model", "color", "plate_number"],
    filters: &[FilterSpec::exact("status", "status")],
    fixed: &[],
    branch_scoped: true,
    date_field: None,
    default_sort: SortKey::desc("created_at"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[
        BRANCH_NAME,
        DerivedField {
            name: "full_name",
            rule: DisplayRule::Joined {
                fields: &["color", "brand", "model"],
                separator: " ",
            },
        },
    ],
    defaults: &[STATUS_ACTIVE],
    signed_amount: None,
};

pub static SERVICES: ResourceDescriptor = ResourceDescriptor {
    name: "services",
    entity: "Service",
    table: "w_services",
    fields: &[
        ID,
        FieldSpec::writable("service_code", Text),
        FieldSpec::writable("description", Text),
        FieldSpec::writable("price", Decimal),
        FieldSpec::writable("status", Text),
        FieldSpec::read_only("update_date", Date),
        FieldSpec::read_only("updated_by", Integer),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[],
    searchable: &["service_code", "description"],
    filters: &[FilterSpec::exact("status", "status")],
    fixed: &[],
    branch_scoped: false,
    date_field: None,
    default_sort: SortKey::desc("created_at"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[],
    defaults: &[STATUS_ACTIVE],
    signed_amount: None,
};

pub static LOOKUPS: ResourceDescriptor = ResourceDescriptor {
    name: "lookups",
    entity: "Lookup",
    table: "w_lookup",
    fields: &[
        ID,
        FieldSpec::writable("category", Text),
        FieldSpec::writable("value", Text),
        FieldSpec::writable("code", Text),
        FieldSpec::writable("is_active", Boolean),
        FieldSpec::writable("list_order", Integer),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[],
    searchable: &["category", "value", "code"],
    filters: &[
        FilterSpec::exact("category", "category"),
        FilterSpec {
            param: "status",
            column: "is_active",
            mode: FilterMode::ActiveFlag,
        },
    ],
    fixed: &[],
    branch_scoped: false,
    date_field: None,
    default_sort: SortKey::asc("category"),
    secondary_sort: Some(SortKey::asc("list_order")),
    column_aliases: &[],
    derived: &[],
    defaults: &[
        ("is_active", DefaultValue::Bool(true)),
        ("list_order", DefaultValue::Integer(0)),
    ],
    signed_amount: None,
};

pub static REGISTERS: ResourceDescriptor = ResourceDescriptor {
    name: "registers",
    entity: "Register",
    table: "w_register",
    fields: &[
        ID,
        FieldSpec::writable("branch_id", Integer),
        FieldSpec::writable("account_id", Integer),
        FieldSpec::writable("transaction_type", Text),
        FieldSpec::writable("transfer_account_id", Integer),
        FieldSpec::read_only("transfer_register_id", Integer),
        FieldSpec::read_only("flag", Text),
        FieldSpec::writable("date", Date),
        FieldSpec::writable("contact_id", Integer),
        FieldSpec::writable("payment_method", Text),
        FieldSpec::writable("category_id", Integer),
        FieldSpec::writable("service_id", Integer),
        FieldSpec::writable("memo", Text),
        FieldSpec::writable("certificate_no", Text),
        FieldSpec::read_only("amount", Decimal),
        FieldSpec::read_only("transaction_status", Text),
        FieldSpec::writable("or_number", Text),
        FieldSpec::writable("check", Text),
        FieldSpec::writable("requisition_id", Integer),
        FieldSpec::read_only("updated_by", Integer),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[
        BRANCH_RELATION,
        Relation {
            name: "account",
            table: "w_accounts",
            foreign_key: "account_id",
            columns: &["id", "account_name", "account_category"],
        },
        Relation {
            name: "category",
            table: "w_account_categories",
            foreign_key: "category_id",
            columns: &["id", "name", "type"],
        },
        Relation {
            name: "contact",
            table: "w_contacts",
            foreign_key: "contact_id",
            columns: &["id", "first_name", "last_name", "nick_name", "company"],
        },
        Relation {
            name: "transfer_account",
            table: "w_accounts",
            foreign_key: "transfer_account_id",
            columns: &["id", "account_name"],
        },
    ],
    searchable: &["memo", "check", "or_number"],
    filters: &[
        FilterSpec::exact("account_id", "account_id"),
        FilterSpec::exact("contact_id", "contact_id"),
        FilterSpec {
            param: "transaction_status",
            column: "transaction_status",
            mode: FilterMode::AnyOf,
        },
    ],
    fixed: &[],
    branch_scoped: true,
    date_field: Some("date"),
    default_sort: SortKey::desc("date"),
    secondary_sort: Some(SortKey::desc("updated_at")),
    column_aliases: &[],
    derived: &[
        BRANCH_NAME,
        DerivedField {
            name: "account_name",
            rule: DisplayRule::RelationField {
                relation: "account",
                field: "account_name",
            },
        },
        DerivedField {
            name: "category_name",
            rule: DisplayRule::RelationField {
                relation: "category",
                field: "name",
            },
        },
        DerivedField {
            name: "contact_name",
            rule: DisplayRule::ContactName {
                relation: "contact",
            },
        },
        DerivedField {
            name: "transfer_account_name",
            rule: DisplayRule::RelationField {
                relation: "transfer_account",
                field: "account_name",
            },
        },
        DerivedField {
            name: "inflow",
            rule: DisplayRule::Inflow { amount: "amount" },
        },
        DerivedField {
            name: "outflow",
            rule: DisplayRule::Outflow { amount: "amount" },
        },
    ],
    defaults: &[("transaction_status", DefaultValue::Text("U"))],
    signed_amount: Some(SignedAmount {
        target: "amount",
        inflow: "inflow",
        outflow: "outflow",
    }),
};

pub static SCHEDULES: ResourceDescriptor = ResourceDescriptor {
    name: "schedules",
    entity: "Schedule",
    table: "w_schedules",
    fields: &[
        ID,
        FieldSpec::writable("branch_id", Integer),
        FieldSpec::writable("date", Date),
        FieldSpec::writable("student_id", Integer),
        FieldSpec::writable("service_id", Integer),
        FieldSpec::writable("start_time", Timestamp),
        FieldSpec::writable("end_time", Timestamp),
        FieldSpec::writable("employee_id", Integer),
        FieldSpec::writable("vehicle_id", Integer),
        FieldSpec::writable("room_id", Integer),
        FieldSpec::writable("status", Text),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[
        BRANCH_RELATION,
        Relation {
            name: "service",
            table: "w_services",
            foreign_key: "service_id",
            columns: &["id", "service_code", "description"],
        },
        Relation {
            name: "instructor",
            table: "w_contacts",
            foreign_key: "employee_id",
            columns: &["id", "first_name", "last_name", "nick_name"],
        },
        Relation {
            name: "vehicle",
            table: "w_vehicles",
            foreign_key: "vehicle_id",
            columns: &["id", "brand", "model", "color", "plate_number"],
        },
        Relation {
            name: "room",
            table: "w_rooms",
            foreign_key: "room_id",
            columns: &["id", "room_name"],
        },
    ],
    searchable: &[],
    filters: &[
        FilterSpec::exact("employee_id", "employee_id"),
        FilterSpec::exact("instructor_id", "employee_id"),
        FilterSpec::exact("service_id", "service_id"),
        FilterSpec::exact("status", "status"),
    ],
    fixed: &[],
    branch_scoped: true,
    date_field: Some("date"),
    default_sort: SortKey::desc("start_time"),
    secondary_sort: None,
    column_aliases: &[("start", "start_time"), ("end", "end_time")],
    derived: &[
        BRANCH_NAME,
        DerivedField {
            name: "service_name",
            rule: DisplayRule::RelationField {
                relation: "service",
                field: "description",
            },
        },
        DerivedField {
            name: "service_code",
            rule: DisplayRule::RelationField {
                relation: "service",
                field: "service_code",
            },
        },
        DerivedField {
            name: "instructor_name",
            rule: DisplayRule::InstructorName {
                relation: "instructor",
            },
        },
        DerivedField {
            name: "vehicle_info",
            rule: DisplayRule::VehicleInfo { relation: "vehicle" },
        },
        DerivedField {
            name: "room_name",
            rule: DisplayRule::RelationField {
                relation: "room",
                field: "room_name",
            },
        },
    ],
    defaults: &[("status", DefaultValue::Text("confirmed"))],
    signed_amount: None,
};

pub static REQUISITIONS: ResourceDescriptor = ResourceDescriptor {
    name: "requisitions",
    entity: "Requisition",
    table: "w_requisition",
    fields: &[
        ID,
        FieldSpec::writable("date", Date),
        FieldSpec::writable("branch_id", Integer),
        FieldSpec::writable("category_id", Integer),
        FieldSpec::writable("account_id", Integer),
        FieldSpec::writable("contact_id", Integer),
        FieldSpec::writable("or_number", Text),
        FieldSpec::writable("check", Text),
        FieldSpec::writable("actual", Text),
        FieldSpec::writable("reason", Text),
        FieldSpec::writable("amount", Decimal),
        FieldSpec::writable("status", Text),
        FieldSpec::read_only("status_date", Date),
        FieldSpec::writable("remarks", Text),
        FieldSpec::writable("created_by", Integer),
        FieldSpec::read_only("updated_by", Integer),
        FieldSpec::read_only("approved_by", Integer),
        FieldSpec::read_only("approved_at", Timestamp),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[
        BRANCH_RELATION,
        Relation {
            name: "contact",
            table: "w_contacts",
            foreign_key: "contact_id",
            columns: &["id", "first_name", "last_name", "nick_name", "company"],
        },
    ],
    searchable: &["reason", "remarks", "or_number"],
    filters: &[
        FilterSpec::exact("category_id", "category_id"),
        FilterSpec::exact("status", "status"),
    ],
    fixed: &[],
    branch_scoped: true,
    date_field: Some("date"),
    default_sort: SortKey::desc("date"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[
        BRANCH_NAME,
        DerivedField {
            name: "contact_name",
            rule: DisplayRule::ContactName {
                relation: "contact",
            },
        },
    ],
    defaults: &[],
    signed_amount: None,
};

pub static BRANCHES: ResourceDescriptor = ResourceDescriptor {
    name: "branches",
    entity: "Branch",
    table: "w_branches",
    fields: &[
        ID,
        FieldSpec::writable("name", Text),
        FieldSpec::writable("branch_code", Text),
        FieldSpec::writable("status", Text),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[],
    searchable: &["name", "branch_code"],
    filters: &[FilterSpec::exact("status", "status")],
    fixed: &[],
    branch_scoped: false,
    date_field: None,
    default_sort: SortKey::asc("name"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[],
    defaults: &[STATUS_ACTIVE],
    signed_amount: None,
};

pub static ACCOUNTS: ResourceDescriptor = ResourceDescriptor {
    name: "accounts",
    entity: "Account",
    table: "w_accounts",
    fields: &[
        ID,
        FieldSpec::writable("account_name", Text),
        FieldSpec::writable("account_category", Integer),
        FieldSpec::writable("status", Text),
        FieldSpec::writable("list_order", Integer),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[Relation {
        name: "category",
        table: "w_account_categories",
        foreign_key: "account_category",
        columns: &["id", "name", "type"],
    }],
    searchable: &["account_name"],
    filters: &[
        FilterSpec::exact("status", "status"),
        FilterSpec::exact("account_category", "account_category"),
    ],
    fixed: &[],
    branch_scoped: false,
    date_field: None,
    default_sort: SortKey::asc("list_order"),
    secondary_sort: Some(SortKey::asc("account_name")),
    column_aliases: &[],
    derived: &[DerivedField {
        name: "category_name",
        rule: DisplayRule::RelationField {
            relation: "category",
            field: "name",
        },
    }],
    defaults: &[STATUS_ACTIVE, ("list_order", DefaultValue::Integer(0))],
    signed_amount: None,
};

pub static ACCOUNT_CATEGORIES: ResourceDescriptor = ResourceDescriptor {
    name: "account-categories",
    entity: "Account category",
    table: "w_account_categories",
    fields: &[
        ID,
        FieldSpec::writable("name", Text),
        FieldSpec::writable("type", Text),
        FieldSpec::writable("list_order", Integer),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[],
    searchable: &["name"],
    filters: &[FilterSpec::exact("type", "type")],
    fixed: &[],
    branch_scoped: false,
    date_field: None,
    default_sort: SortKey::asc("list_order"),
    secondary_sort: Some(SortKey::asc("name")),
    column_aliases: &[],
    derived: &[],
    defaults: &[("list_order", DefaultValue::Integer(0))],
    signed_amount: None,
};

pub static ROOMS: ResourceDescriptor = ResourceDescriptor {
    name: "rooms",
    entity: "Room",
    table: "w_rooms",
    fields: &[
        ID,
        FieldSpec::writable("branch_id", Integer),
        FieldSpec::writable("room_name", Text),
        FieldSpec::writable("status", Text),
        CREATED_AT,
        UPDATED_AT,
    ],
    relations: &[BRANCH_RELATION],
    searchable: &["room_name"],
    filters: &[FilterSpec::exact("status", "status")],
    fixed: &[],
    branch_scoped: true,
    date_field: None,
    default_sort: SortKey::asc("room_name"),
    secondary_sort: None,
    column_aliases: &[],
    derived: &[BRANCH_NAME],
    defaults: &[STATUS_ACTIVE],
    signed_amount: None,
};

/// Every resource served by the service.
pub static CATALOG: &[&ResourceDescriptor] = &[
    &CONTACTS,
    &EMPLOYEES,
    &STUDENTS,
    &VEHICLES,
    &SERVICES,
    &LOOKUPS,
    &REGISTERS,
    &SCHEDULES,
    &REQUISITIONS,
    &BRANCHES,
    &ACCOUNTS,
    &ACCOUNT_CATEGORIES,
    &ROOMS,
];

/// Look up a resource by name.
pub fn find(name: &str) -> Result<&'static ResourceDescriptor, CoreError> {
    CATALOG
        .iter()
        .copied()
        .find(|r| r.name == name)
        .ok_or_else(|| CoreError::UnknownResource(name.to_string()))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
