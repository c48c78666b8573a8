// 集成测试公共模块
//
// 提供桥接替身和页面构造辅助

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use navio::bridge::{BridgeFuture, BridgeRequest, BridgeResponse, NativeBridge};
use navio::error::BridgeError;
use navio::page::Page;
use navio::utils::url::Url;

pub const SEARCH_LOCATION: &str = "https://www.google.com/search?q=coffee";

/// 以搜索结果页地址加载 body 片段
pub fn search_page(body: &str) -> Page {
    page_at(body, SEARCH_LOCATION)
}

pub fn page_at(body: &str, location: &str) -> Page {
    Page::from_html(
        &format!("<!DOCTYPE html><html><head></head><body>{}</body></html>", body),
        Url::parse(location).unwrap(),
    )
}

/// 按预设应答回复并记录所有请求的桥接
pub struct ScriptedBridge {
    reply: Result<BridgeResponse, BridgeError>,
    requests: RefCell<Vec<BridgeRequest>>,
}

impl ScriptedBridge {
    pub fn replying(reply: Result<BridgeResponse, BridgeError>) -> Rc<Self> {
        Rc::new(Self {
            reply,
            requests: RefCell::new(Vec::new()),
        })
    }

    pub fn opening() -> Rc<Self> {
        Self::replying(Ok(BridgeResponse::ok("Apple Maps opened successfully")))
    }

    pub fn rejecting() -> Rc<Self> {
        Self::replying(Err(BridgeError::Rejected("no native app".to_string())))
    }

    pub fn delegating() -> Rc<Self> {
        Self::replying(Ok(BridgeResponse::delegated("URL opening delegated to the page")))
    }

    pub fn requests(&self) -> Vec<BridgeRequest> {
        self.requests.borrow().clone()
    }
}

impl NativeBridge for ScriptedBridge {
    fn send_native_message(&self, request: BridgeRequest) -> BridgeFuture {
        self.requests.borrow_mut().push(request);
        let reply = self.reply.clone();
        Box::pin(async move { reply })
    }
}

/// 永远不回复的桥接
pub struct HangingBridge;

impl NativeBridge for HangingBridge {
    fn send_native_message(&self, _request: BridgeRequest) -> BridgeFuture {
        Box::pin(std::future::pending())
    }
}
