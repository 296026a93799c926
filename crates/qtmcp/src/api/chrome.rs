/*!
Accessibility-tree API surface (`chr.*`).

Browser-flavored automation over ephemeral numeric refs: read the page,
find elements, click and fill them, and read captured console output.
Refs are minted by `readPage`/`find` and die on the next `readPage` or on
disconnect.
*/

use std::sync::Arc;

use serde_json::{json, Value};

use crate::access::{walk, PageFilter, PageParams};
use crate::probe::ProbeShared;
use crate::rpc::{
  opt_bool_param, opt_str_param, opt_u64_param, str_param, value_param, Dispatcher, Reply,
};
use crate::types::{ProbeError, ProbeResult};

pub(super) fn register(d: &mut Dispatcher, shared: &Arc<ProbeShared>) {
  use super::method;

  method(d, shared, "chr.readPage", read_page);
  method(d, shared, "chr.click", click);
  method(d, shared, "chr.formInput", form_input);
  method(d, shared, "chr.getPageText", get_page_text);
  method(d, shared, "chr.find", find);
  method(d, shared, "chr.navigate", navigate);
  method(d, shared, "chr.tabsContext", tabs_context);
  method(d, shared, "chr.readConsoleMessages", read_console_messages);
}

fn read_page(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let filter = match opt_str_param(params, "filter")? {
    None => PageFilter::All,
    Some(s) => PageFilter::parse(s)
      .ok_or_else(|| ProbeError::InvalidParams(format!("unknown filter {s:?}")))?,
  };
  let page = PageParams {
    ref_id: opt_str_param(params, "ref_id")?.map(str::to_owned),
    filter,
    depth: opt_u64_param(params, "depth")?.unwrap_or(walk::MAX_PAGE_DEPTH as u64) as usize,
    max_chars: opt_u64_param(params, "max_chars")?.unwrap_or(walk::DEFAULT_MAX_CHARS as u64)
      as usize,
  };
  let result = walk::read_page(shared.host.as_ref(), &shared.refs, &page)?;
  Ok(Reply::new(result))
}

fn click(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let r = str_param(params, "ref")?;
  let result = walk::click(shared.host.as_ref(), &shared.refs, r)?;
  Ok(Reply::new(result))
}

fn form_input(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let r = str_param(params, "ref")?;
  let value = value_param(params, "value")?;
  let result = walk::form_input(&shared.refs, r, value)?;
  Ok(Reply::new(result))
}

fn get_page_text(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  let result = walk::page_text(shared.host.as_ref())?;
  Ok(Reply::new(result))
}

fn find(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let query = str_param(params, "query")?;
  let result = walk::find(shared.host.as_ref(), &shared.refs, query)?;
  Ok(Reply::new(result))
}

fn navigate(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  let action = str_param(params, "action")?;
  let r = opt_str_param(params, "ref")?;
  let result = walk::navigate(shared.host.as_ref(), &shared.refs, action, r)?;
  Ok(Reply::new(result))
}

fn tabs_context(shared: &Arc<ProbeShared>, _params: &Value) -> ProbeResult<Reply> {
  Ok(Reply::new(walk::tabs_context(shared.host.as_ref())))
}

fn read_console_messages(shared: &Arc<ProbeShared>, params: &Value) -> ProbeResult<Reply> {
  if !shared.logbuf.installed() {
    return Err(ProbeError::ConsoleNotAvailable);
  }
  let pattern = opt_str_param(params, "pattern")?;
  let only_errors = opt_bool_param(params, "onlyErrors")?.unwrap_or(false);
  let clear = opt_bool_param(params, "clear")?.unwrap_or(false);
  let limit = opt_u64_param(params, "limit")?.map(|n| n as usize);

  let messages = shared.logbuf.query(pattern, only_errors, limit);
  if clear {
    shared.logbuf.clear();
  }
  let messages = serde_json::to_value(&messages)
    .map_err(|e| ProbeError::Internal(format!("serializing messages: {e}")))?;
  Ok(Reply::new(json!({
    "count": messages.as_array().map_or(0, Vec::len),
    "messages": messages,
  })))
}
