diesel::table! {
    teams (id) {
        id -> Integer,
        name -> Text,
    }
}

diesel::table! {
    members (id) {
        id -> Integer,
        username -> Nullable<Text>,
        age -> Integer,
        team_id -> Nullable<Integer>,
    }
}

diesel::table! {
    items (id) {
        id -> Integer,
        dtype -> Text,
        name -> Text,
        price -> Integer,
        stock_quantity -> Integer,
        author -> Nullable<Text>,
        isbn -> Nullable<Text>,
        artist -> Nullable<Text>,
        etc -> Nullable<Text>,
    }
}

diesel::table! {
    deliveries (id) {
        id -> Integer,
        city -> Nullable<Text>,
        street -> Nullable<Text>,
        zipcode -> Nullable<Text>,
        status -> Text,
    }
}

diesel::table! {
    orders (id) {
        id -> Integer,
        member_id -> Integer,
        delivery_id -> Integer,
        order_date -> Timestamp,
        status -> Text,
    }
}

diesel::table! {
    order_items (id) {
        id -> Integer,
        order_id -> Integer,
        item_id -> Integer,
        order_price -> Integer,
        quantity -> Integer,
    }
}

diesel::joinable!(members -> teams (team_id));
diesel::joinable!(orders -> members (member_id));
diesel::joinable!(orders -> deliveries (delivery_id));
diesel::joinable!(order_items -> orders (order_id));
diesel::joinable!(order_items -> items (item_id));

diesel::allow_tables_to_appear_in_same_query!(
    teams,
    members,
    items,
    deliveries,
    orders,
    order_items,
);
