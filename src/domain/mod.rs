// 領域層：計畫快照、結果模型與對外部協作者的介面
pub mod model;
pub mod ports;
