pub mod networking_proxy {
    include!("com.webank.ai.eggroll.api.networking.proxy.rs");
}
