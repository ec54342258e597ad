//! [`Entity`] descriptions for every table served by the generic repository.

use retail_core::{
    BrandId, CategoryId, CodeId, CustomerId, OrderId, OrderItemId, ProductId, StaffId, StockId,
    StoreId, UserId,
};

use super::repository::{Assignments, Entity};
use crate::models::{
    Brand, BrandInput, BrandPatch, Category, CategoryInput, CategoryPatch, Code, CodeInput,
    CodePatch, Customer, CustomerInput, CustomerPatch, NewUser, Order, OrderInput, OrderItem,
    OrderItemInput, OrderItemPatch, OrderPatch, Product, ProductInput, ProductPatch, Staff,
    StaffInput, StaffPatch, Stock, StockInput, StockPatch, Store, StoreInput, StorePatch, User,
    UserPatch,
};

// =============================================================================
// Users
// =============================================================================

/// Users are created through registration and never patched.
impl Entity for User {
    type Id = UserId;
    type Input = NewUser;
    type Patch = UserPatch;

    const NAME: &'static str = "user";
    const TABLE: &'static str = "users";
    const ID_COLUMN: &'static str = "user_id";
    const SELECT_COLUMNS: &'static str =
        "user_id, first_name, last_name, login, phone_number, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["login", "first_name", "last_name"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &NewUser) -> Assignments {
        Assignments::new()
            .set("first_name", input.first_name.clone())
            .set("last_name", input.last_name.clone())
            .set("login", input.login.clone())
            .set("password_hash", input.password_hash.clone())
            .set("phone_number", input.phone_number.clone())
    }

    fn patch_assignments(patch: &UserPatch) -> Assignments {
        match *patch {}
    }
}

// =============================================================================
// Catalog
// =============================================================================

impl Entity for Category {
    type Id = CategoryId;
    type Input = CategoryInput;
    type Patch = CategoryPatch;

    const NAME: &'static str = "category";
    const TABLE: &'static str = "categories";
    const ID_COLUMN: &'static str = "category_id";
    const SELECT_COLUMNS: &'static str = "category_id, category_name, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["category_name"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &CategoryInput) -> Assignments {
        Assignments::new().set("category_name", input.category_name.clone())
    }

    fn patch_assignments(patch: &CategoryPatch) -> Assignments {
        Assignments::new().set_if_present("category_name", &patch.category_name)
    }
}

impl Entity for Brand {
    type Id = BrandId;
    type Input = BrandInput;
    type Patch = BrandPatch;

    const NAME: &'static str = "brand";
    const TABLE: &'static str = "brands";
    const ID_COLUMN: &'static str = "brand_id";
    const SELECT_COLUMNS: &'static str = "brand_id, brand_name, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["brand_name"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &BrandInput) -> Assignments {
        Assignments::new().set("brand_name", input.brand_name.clone())
    }

    fn patch_assignments(patch: &BrandPatch) -> Assignments {
        Assignments::new().set_if_present("brand_name", &patch.brand_name)
    }
}

impl Entity for Product {
    type Id = ProductId;
    type Input = ProductInput;
    type Patch = ProductPatch;

    const NAME: &'static str = "product";
    const TABLE: &'static str = "products";
    const ID_COLUMN: &'static str = "product_id";
    const SELECT_COLUMNS: &'static str = "product_id, product_name, brand_id, category_id, \
         model_year, list_price, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["product_name"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &ProductInput) -> Assignments {
        Assignments::new()
            .set("product_name", input.product_name.clone())
            .set("brand_id", input.brand_id)
            .set("category_id", input.category_id)
            .set("model_year", input.model_year)
            .set("list_price", input.list_price)
    }

    fn patch_assignments(patch: &ProductPatch) -> Assignments {
        Assignments::new()
            .set_if_present("product_name", &patch.product_name)
            .set_if_present("brand_id", &patch.brand_id)
            .set_if_present("category_id", &patch.category_id)
            .set_if_present("model_year", &patch.model_year)
            .set_if_present("list_price", &patch.list_price)
    }
}

impl Entity for Stock {
    type Id = StockId;
    type Input = StockInput;
    type Patch = StockPatch;

    const NAME: &'static str = "stock";
    const TABLE: &'static str = "stocks";
    const ID_COLUMN: &'static str = "stock_id";
    const SELECT_COLUMNS: &'static str =
        "stock_id, store_id, product_id, quantity, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &[];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &StockInput) -> Assignments {
        Assignments::new()
            .set("store_id", input.store_id)
            .set("product_id", input.product_id)
            .set("quantity", input.quantity)
    }

    fn patch_assignments(patch: &StockPatch) -> Assignments {
        Assignments::new()
            .set_if_present("store_id", &patch.store_id)
            .set_if_present("product_id", &patch.product_id)
            .set_if_present("quantity", &patch.quantity)
    }
}

// =============================================================================
// Stores, Staff, Customers
// =============================================================================

impl Entity for Store {
    type Id = StoreId;
    type Input = StoreInput;
    type Patch = StorePatch;

    const NAME: &'static str = "store";
    const TABLE: &'static str = "stores";
    const ID_COLUMN: &'static str = "store_id";
    const SELECT_COLUMNS: &'static str = "store_id, store_name, phone, email, street, city, \
         state, zip_code, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["store_name", "city"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &StoreInput) -> Assignments {
        Assignments::new()
            .set("store_name", input.store_name.clone())
            .set("phone", input.phone.clone())
            .set("email", input.email.clone())
            .set("street", input.street.clone())
            .set("city", input.city.clone())
            .set("state", input.state.clone())
            .set("zip_code", input.zip_code.clone())
    }

    fn patch_assignments(patch: &StorePatch) -> Assignments {
        Assignments::new()
            .set_if_present("store_name", &patch.store_name)
            .set_if_present("phone", &patch.phone)
            .set_if_present("email", &patch.email)
            .set_if_present("street", &patch.street)
            .set_if_present("city", &patch.city)
            .set_if_present("state", &patch.state)
            .set_if_present("zip_code", &patch.zip_code)
    }
}

impl Entity for Staff {
    type Id = StaffId;
    type Input = StaffInput;
    type Patch = StaffPatch;

    const NAME: &'static str = "staff";
    const TABLE: &'static str = "staffs";
    const ID_COLUMN: &'static str = "staff_id";
    const SELECT_COLUMNS: &'static str = "staff_id, first_name, last_name, email, phone, active, \
         store_id, manager_id, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["first_name", "last_name", "email"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &StaffInput) -> Assignments {
        Assignments::new()
            .set("first_name", input.first_name.clone())
            .set("last_name", input.last_name.clone())
            .set("email", input.email.clone())
            .set("phone", input.phone.clone())
            .set("active", input.active)
            .set("store_id", input.store_id)
            .set("manager_id", input.manager_id)
    }

    fn patch_assignments(patch: &StaffPatch) -> Assignments {
        Assignments::new()
            .set_if_present("first_name", &patch.first_name)
            .set_if_present("last_name", &patch.last_name)
            .set_if_present("email", &patch.email)
            .set_if_present("phone", &patch.phone)
            .set_if_present("active", &patch.active)
            .set_if_present("store_id", &patch.store_id)
            .set_if_present("manager_id", &patch.manager_id)
    }
}

impl Entity for Customer {
    type Id = CustomerId;
    type Input = CustomerInput;
    type Patch = CustomerPatch;

    const NAME: &'static str = "customer";
    const TABLE: &'static str = "customers";
    const ID_COLUMN: &'static str = "customer_id";
    const SELECT_COLUMNS: &'static str = "customer_id, first_name, last_name, phone, email, \
         street, city, state, zip_code, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["first_name", "last_name", "email"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &CustomerInput) -> Assignments {
        Assignments::new()
            .set("first_name", input.first_name.clone())
            .set("last_name", input.last_name.clone())
            .set("phone", input.phone.clone())
            .set("email", input.email.clone())
            .set("street", input.street.clone())
            .set("city", input.city.clone())
            .set("state", input.state.clone())
            .set("zip_code", input.zip_code.clone())
    }

    fn patch_assignments(patch: &CustomerPatch) -> Assignments {
        Assignments::new()
            .set_if_present("first_name", &patch.first_name)
            .set_if_present("last_name", &patch.last_name)
            .set_if_present("phone", &patch.phone)
            .set_if_present("email", &patch.email)
            .set_if_present("street", &patch.street)
            .set_if_present("city", &patch.city)
            .set_if_present("state", &patch.state)
            .set_if_present("zip_code", &patch.zip_code)
    }
}

// =============================================================================
// Sales
// =============================================================================

impl Entity for Order {
    type Id = OrderId;
    type Input = OrderInput;
    type Patch = OrderPatch;

    const NAME: &'static str = "order";
    const TABLE: &'static str = "orders";
    const ID_COLUMN: &'static str = "order_id";
    const SELECT_COLUMNS: &'static str = "order_id, customer_id, order_status, order_date, \
         required_date, shipped_date, store_id, staff_id, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &[];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &OrderInput) -> Assignments {
        Assignments::new()
            .set("customer_id", input.customer_id)
            .set("order_status", input.order_status)
            .set("order_date", input.order_date)
            .set("required_date", input.required_date)
            .set("shipped_date", input.shipped_date)
            .set("store_id", input.store_id)
            .set("staff_id", input.staff_id)
    }

    fn patch_assignments(patch: &OrderPatch) -> Assignments {
        Assignments::new()
            .set_if_present("customer_id", &patch.customer_id)
            .set_if_present("order_status", &patch.order_status)
            .set_if_present("order_date", &patch.order_date)
            .set_if_present("required_date", &patch.required_date)
            .set_if_present("shipped_date", &patch.shipped_date)
            .set_if_present("store_id", &patch.store_id)
            .set_if_present("staff_id", &patch.staff_id)
    }
}

impl Entity for OrderItem {
    type Id = OrderItemId;
    type Input = OrderItemInput;
    type Patch = OrderItemPatch;

    const NAME: &'static str = "order item";
    const TABLE: &'static str = "order_items";
    const ID_COLUMN: &'static str = "order_item_id";
    const SELECT_COLUMNS: &'static str =
        "order_item_id, order_id, product_id, quantity, list_price, discount";
    const SEARCH_COLUMNS: &'static [&'static str] = &[];
    const TIMESTAMPED: bool = false;

    fn assignments(input: &OrderItemInput) -> Assignments {
        Assignments::new()
            .set("order_id", input.order_id)
            .set("product_id", input.product_id)
            .set("quantity", input.quantity)
            .set("list_price", input.list_price)
            .set("discount", input.discount)
    }

    fn patch_assignments(patch: &OrderItemPatch) -> Assignments {
        Assignments::new()
            .set_if_present("product_id", &patch.product_id)
            .set_if_present("quantity", &patch.quantity)
            .set_if_present("list_price", &patch.list_price)
            .set_if_present("discount", &patch.discount)
    }
}

impl Entity for Code {
    type Id = CodeId;
    type Input = CodeInput;
    type Patch = CodePatch;

    const NAME: &'static str = "code";
    const TABLE: &'static str = "codes";
    const ID_COLUMN: &'static str = "code_id";
    const SELECT_COLUMNS: &'static str =
        "code_id, code_name, discount, discount_type, valid_until, created_at, updated_at";
    const SEARCH_COLUMNS: &'static [&'static str] = &["code_name"];
    const TIMESTAMPED: bool = true;

    fn assignments(input: &CodeInput) -> Assignments {
        Assignments::new()
            .set("code_name", input.code_name.clone())
            .set("discount", input.discount)
            .set("discount_type", input.discount_type)
            .set("valid_until", input.valid_until)
    }

    fn patch_assignments(patch: &CodePatch) -> Assignments {
        Assignments::new()
            .set_if_present("code_name", &patch.code_name)
            .set_if_present("discount", &patch.discount)
            .set_if_present("discount_type", &patch.discount_type)
            .set_if_present("valid_until", &patch.valid_until)
    }
}
