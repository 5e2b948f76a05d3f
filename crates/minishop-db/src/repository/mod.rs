pub mod item;
pub mod member;
pub mod order;
pub mod team;

pub use item::ItemRepository;
pub use member::MemberRepository;
pub use order::OrderRepository;
pub use team::TeamRepository;
