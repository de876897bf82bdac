//! Table declarations for the five bookkeeping entities
//!
//! Column order here is the order used for select lists, insert column
//! lists and JSON responses.

/// Declared column type, before the numeric allowlist is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Timestamp,
    Float,
    Integer,
}

impl FieldKind {
    pub fn is_numeric(self) -> bool {
        matches!(self, Self::Float | Self::Integer)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Timestamp => "timestamp",
            Self::Float => "float",
            Self::Integer => "integer",
        }
    }
}

/// A declared column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn text(name: &'static str) -> Field {
    Field { name, kind: FieldKind::Text }
}

const fn timestamp(name: &'static str) -> Field {
    Field { name, kind: FieldKind::Timestamp }
}

const fn float(name: &'static str) -> Field {
    Field { name, kind: FieldKind::Float }
}

const fn integer(name: &'static str) -> Field {
    Field { name, kind: FieldKind::Integer }
}

/// Static description of one table
#[derive(Debug)]
pub struct EntitySchema {
    /// Resource name used in messages and logs
    pub resource: &'static str,
    pub table: &'static str,
    /// Natural key columns, in the order they appear in query strings
    pub key: &'static [&'static str],
    /// Every client-visible column, key columns included
    pub fields: &'static [Field],
    /// Whether the table carries add/update audit columns
    pub audited: bool,
}

impl EntitySchema {
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn is_key(&self, name: &str) -> bool {
        self.key.contains(&name)
    }
}

/// The five tables behind the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
    Customer,
    Group,
    Location,
    Currency,
    Enrollment,
}

impl Entity {
    pub const ALL: [Entity; 5] = [
        Entity::Customer,
        Entity::Group,
        Entity::Location,
        Entity::Currency,
        Entity::Enrollment,
    ];

    pub fn schema(self) -> &'static EntitySchema {
        match self {
            Self::Customer => &CUSTOMER,
            Self::Group => &GROUP,
            Self::Location => &LOCATION,
            Self::Currency => &CURRENCY,
            Self::Enrollment => &ENROLLMENT,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Customer => 0,
            Self::Group => 1,
            Self::Location => 2,
            Self::Currency => 3,
            Self::Enrollment => 4,
        }
    }
}

/// Departure date column shared by groups and enrollments
pub const DEPARTURE_DATE: &str = "出團日期";

/// Derived enrollment count attached to group responses
pub const HEADCOUNT: &str = "客戶總數";

pub static CUSTOMER: EntitySchema = EntitySchema {
    resource: "customer",
    table: "T_客戶",
    key: &["ID"],
    fields: &[
        text("ID"),
        text("姓名"),
        text("性別"),
        timestamp("生日"),
        text("職級"),
        text("電話"),
        text("手機"),
        text("郵遞區號"),
        text("地址"),
        text("EMAIL"),
        text("備註"),
        float("佣金比率A"),
        float("佣金比率B"),
        float("信用額度"),
        text("介紹人"),
        float("介紹人佣金比率A"),
        float("介紹人佣金比率B"),
        float("公司佣金比率B"),
        float("公司借支佣金率C"),
    ],
    audited: true,
};

pub static GROUP: EntitySchema = EntitySchema {
    resource: "group",
    table: "T_旅行團",
    key: &[DEPARTURE_DATE],
    fields: &[
        timestamp(DEPARTURE_DATE),
        text("貨幣1"),
        float("匯率1"),
        text("貨幣2"),
        float("匯率2"),
        text("貨幣3"),
        float("匯率3"),
        text("貨幣4"),
        float("匯率4"),
        text("貨幣5"),
        float("匯率5"),
        text("貨幣6"),
        float("匯率6"),
        text("貨幣7"),
        float("匯率7"),
        text("貨幣8"),
        float("匯率8"),
        float("盤房領回主貨幣"),
        float("主貨幣現金單"),
        float("盤房領回台幣"),
        float("台幣現金單"),
        text("地點"),
        float("損_公司總入金"),
        float("損_換算主貨幣"),
        float("損_總洗碼"),
        float("損_總回碼"),
        float("損_淨洗碼"),
        float("損_公司退佣"),
        float("損_出差費1"),
        integer("損_出差費1_人數"),
        float("損_出差費2"),
        integer("損_出差費2_人數"),
        float("損_出差費3"),
        integer("損_出差費3_人數"),
        float("損_港務費"),
        integer("損_港務費_人數"),
        float("損_其他支出費用_台幣"),
        float("損_其他支出費用_主貨幣"),
        text("團隊領款單_應領帳戶餘額"),
        text("團隊領款單_應領退佣"),
        text("團隊領款單_其他"),
        text("團隊領款單_應付款項"),
        text("團隊領款單_應領總金額"),
        text("團隊領款單_港幣金額"),
        text("團隊領款單_台幣金額"),
        text("團隊領款單_台支金額"),
        text("團隊領款單_外幣"),
        text("團隊領款單_外幣金額"),
    ],
    audited: true,
};

pub static LOCATION: EntitySchema = EntitySchema {
    resource: "location",
    table: "T_地點",
    key: &["地點"],
    fields: &[text("地點")],
    audited: false,
};

pub static CURRENCY: EntitySchema = EntitySchema {
    resource: "currency",
    table: "T_貨幣",
    key: &["貨幣名稱"],
    fields: &[text("貨幣名稱"), text("貨幣代碼"), float("預設匯率")],
    audited: true,
};

pub static ENROLLMENT: EntitySchema = EntitySchema {
    resource: "group enrollment",
    table: "T_旅行團客戶",
    key: &["客戶ID", DEPARTURE_DATE],
    fields: &[
        text("客戶ID"),
        timestamp(DEPARTURE_DATE),
        text("姓名"),
        text("備註"),
        float("佣金比率A"),
        float("佣金比率B"),
        text("介紹人"),
        float("介紹人佣金比率A"),
        float("介紹人佣金比率B"),
        float("公司佣金比率B"),
        float("公司借支佣金率C"),
        float("貨幣1_數量"),
        float("貨幣1"),
        float("貨幣2_數量"),
        float("貨幣2"),
        float("貨幣3_數量"),
        float("貨幣3"),
        float("貨幣4_數量"),
        float("貨幣4"),
        float("貨幣5_數量"),
        float("貨幣5"),
        float("貨幣6_數量"),
        float("貨幣6"),
        float("貨幣7_數量"),
        float("貨幣7"),
        float("貨幣8_數量"),
        float("貨幣8"),
        float("入金總額"),
        float("帳面餘額"),
        float("洗碼數B"),
        float("洗碼數A"),
        float("淨洗碼數A"),
        float("淨洗碼數B"),
        float("淨洗碼數"),
        float("佣金"),
        float("客應付款項"),
        float("其他"),
        float("客應領付總金額"),
        float("領款金額_貨幣1"),
        float("領款金額_貨幣2"),
        float("領款金額_貨幣3"),
        float("領款金額_貨幣4"),
        float("領款金額_貨幣5"),
        float("領款金額_貨幣6"),
        float("領款金額_貨幣7"),
        float("領款金額_貨幣8"),
        float("領款金額_其他"),
    ],
    audited: false,
};
