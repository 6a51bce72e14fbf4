// Diesel table declarations mirroring the DDL in `registry`.

diesel::table! {
    products (product_id) {
        product_id -> BigInt,
        name -> Text,
        category -> Text,
        price -> Double,
    }
}

diesel::table! {
    customers (customer_id) {
        customer_id -> BigInt,
        first_name -> Text,
        last_name -> Text,
        email -> Text,
        signup_date -> Text,
    }
}

diesel::table! {
    orders (order_id) {
        order_id -> BigInt,
        customer_id -> BigInt,
        order_date -> Text,
        total_amount -> Double,
    }
}

diesel::table! {
    order_items (order_item_id) {
        order_item_id -> BigInt,
        order_id -> BigInt,
        product_id -> BigInt,
        quantity -> BigInt,
        unit_price -> Double,
    }
}

diesel::table! {
    reviews (review_id) {
        review_id -> BigInt,
        product_id -> BigInt,
        customer_id -> BigInt,
        rating -> BigInt,
        review_text -> Text,
        review_date -> Text,
    }
}
